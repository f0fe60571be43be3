//! Good-mods import/export: a plain-text list of mods the user has already
//! cleared, used to seed `ConfirmedGood` in bulk or to hand off a session's
//! findings.

use std::collections::BTreeSet;

use crate::registry::{ModId, Registry};

const ENABLED_SUFFIX: &str = "";
const DISABLED_SUFFIX: &str = ".disabled";

#[derive(Debug, Clone, Default)]
pub struct GoodListImportResult {
    pub matched: BTreeSet<ModId>,
    pub warnings: Vec<String>,
}

impl GoodListImportResult {
    pub fn unique_resolved(&self) -> usize {
        self.matched.len()
    }
}

/// Parse a good-mods import file against `registry`.
///
/// Matching order per entry: first `baseFilename + enabled/disabled suffix`
/// (case-insensitive), then bare `id` (case-sensitive). Unmatched entries are
/// warned and skipped; `#`-prefixed and blank lines are ignored.
pub fn import_good_mods(content: &str, registry: &Registry) -> GoodListImportResult {
    let mut result = GoodListImportResult::default();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match resolve_entry(line, registry) {
            Some(id) => {
                result.matched.insert(id);
            }
            None => result
                .warnings
                .push(format!("unmatched good-mods entry: {line}")),
        }
    }

    result
}

fn resolve_entry(entry: &str, registry: &Registry) -> Option<ModId> {
    let lower = entry.to_ascii_lowercase();
    for id in registry.ids() {
        let record = registry.get(id)?;
        let enabled_name = format!("{}{}", record.base_filename, ENABLED_SUFFIX);
        let disabled_name = format!("{}{}", record.base_filename, DISABLED_SUFFIX);
        if lower == enabled_name.to_ascii_lowercase() || lower == disabled_name.to_ascii_lowercase()
        {
            return Some(id.clone());
        }
    }

    registry.ids().find(|id| id.as_str() == entry).cloned()
}

/// Render the export file: a `#`-prefixed header followed by every mod id
/// not currently `ConfirmedGood`, sorted.
pub fn export_good_mods(registry: &Registry, status: &crate::status::StatusStore) -> String {
    let mut out = String::from("# mods still under suspicion\n");
    for id in registry.ids() {
        if !status.status(id).confirmed_good {
            out.push_str(id.as_str());
            out.push('\n');
        }
    }
    out
}
