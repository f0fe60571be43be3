//! Mod registry: immutable-after-load mapping from mod identifier to record,
//! plus the `provides` index and the community-curated override table.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use semver::{Version, VersionReq};
use thiserror::Error;

/// Stable, globally-unique (within one load) mod identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModId(pub String);

impl ModId {
    pub fn new(s: impl Into<String>) -> Self {
        ModId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModId {
    fn from(s: &str) -> Self {
        ModId(s.to_string())
    }
}

impl From<String> for ModId {
    fn from(s: String) -> Self {
        ModId(s)
    }
}

/// One `depends`/`breaks` edge: a virtual identifier plus the version
/// predicate a satisfying provider must match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DepEntry {
    /// The identifier being depended upon or conflicted with — matched
    /// against every mod's `provides` set (which implicitly includes its
    /// own `id`).
    pub target: String,
    /// The opaque version predicate a provider must satisfy.
    pub predicate: VersionReqOrd,
}

impl DepEntry {
    pub fn new(target: impl Into<String>, predicate: VersionReq) -> Self {
        DepEntry {
            target: target.into(),
            predicate: VersionReqOrd(predicate),
        }
    }
}

/// `semver::VersionReq` does not implement `Ord`; this newtype provides a
/// stable (string-based) total order so `DepEntry` can live in sorted
/// collections, matching the engine's determinism requirement.
#[derive(Debug, Clone)]
pub struct VersionReqOrd(pub VersionReq);

impl PartialEq for VersionReqOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_string() == other.0.to_string()
    }
}
impl Eq for VersionReqOrd {}
impl PartialOrd for VersionReqOrd {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for VersionReqOrd {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.to_string().cmp(&other.0.to_string())
    }
}

/// An immutable mod record as delivered by the (out-of-scope) manifest parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModRecord {
    pub id: ModId,
    pub base_filename: String,
    pub version: Version,
    pub provides: BTreeSet<String>,
    pub depends: Vec<DepEntry>,
    pub breaks: Vec<DepEntry>,
    pub suggests: BTreeSet<String>,
    pub recommends: BTreeSet<String>,
}

impl ModRecord {
    /// A minimal record with no dependency edges, useful for tests and demos.
    pub fn bare(id: impl Into<String>, base_filename: impl Into<String>, version: &str) -> Self {
        ModRecord {
            id: ModId::new(id.into()),
            base_filename: base_filename.into(),
            version: Version::parse(version).expect("valid semver"),
            provides: BTreeSet::new(),
            depends: Vec::new(),
            breaks: Vec::new(),
            suggests: BTreeSet::new(),
            recommends: BTreeSet::new(),
        }
    }

    /// The full `provides` set including the implicit self-identifier.
    pub fn all_provides(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.provides.iter().map(String::as_str))
    }
}

/// A curated dependency correction keyed by (mod id, version predicate).
///
/// Applied as an additive patch: the `depends`/`breaks` entries it lists are
/// appended to the matching `ModRecord`'s own entries at load time, never
/// replacing anything the manifest already declared.
#[derive(Debug, Clone)]
pub struct OverrideEntry {
    pub mod_id: ModId,
    pub version_predicate: VersionReq,
    pub extra_depends: Vec<DepEntry>,
    pub extra_breaks: Vec<DepEntry>,
}

/// Community-curated corrections, merged into the registry at load time.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: Vec<OverrideEntry>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: OverrideEntry) {
        self.entries.push(entry);
    }

    /// Apply every matching override to `records`, mutating in place.
    fn apply(&self, records: &mut BTreeMap<ModId, ModRecord>) {
        for entry in &self.entries {
            if let Some(record) = records.get_mut(&entry.mod_id) {
                if crate::version_match::satisfies(&record.version, &entry.version_predicate) {
                    record.depends.extend(entry.extra_depends.iter().cloned());
                    record.breaks.extend(entry.extra_breaks.iter().cloned());
                }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate mod id {0} in load")]
    DuplicateId(ModId),
}

/// Immutable-after-load mod registry, plus its `provides` index.
#[derive(Debug, Clone)]
pub struct Registry {
    mods: BTreeMap<ModId, ModRecord>,
    /// identifier (own id or declared `provides` entry) -> providing mod ids.
    provides_index: BTreeMap<String, BTreeSet<ModId>>,
}

impl Registry {
    /// Load a registry from parsed records, merging the override table first.
    pub fn load(records: Vec<ModRecord>, overrides: &OverrideTable) -> Result<Self, RegistryError> {
        let mut mods = BTreeMap::new();
        for record in records {
            let id = record.id.clone();
            if mods.insert(id.clone(), record).is_some() {
                return Err(RegistryError::DuplicateId(id));
            }
        }

        overrides.apply(&mut mods);

        let mut provides_index: BTreeMap<String, BTreeSet<ModId>> = BTreeMap::new();
        for record in mods.values() {
            for provided in record.all_provides() {
                provides_index
                    .entry(provided.to_string())
                    .or_default()
                    .insert(record.id.clone());
            }
        }

        Ok(Registry {
            mods,
            provides_index,
        })
    }

    pub fn get(&self, id: &ModId) -> Option<&ModRecord> {
        self.mods.get(id)
    }

    pub fn contains(&self, id: &ModId) -> bool {
        self.mods.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ModId> {
        self.mods.keys()
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Every mod that provides `target`, in id order.
    pub fn providers_of(&self, target: &str) -> impl Iterator<Item = &ModId> {
        self.provides_index
            .get(target)
            .into_iter()
            .flat_map(|set| set.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_builds_provides_index_including_self() {
        let registry = Registry::load(
            vec![ModRecord::bare("m1", "m1.jar", "1.0.0")],
            &OverrideTable::new(),
        )
        .unwrap();
        assert_eq!(
            registry.providers_of("m1").collect::<Vec<_>>(),
            vec![&ModId::new("m1")]
        );
    }

    #[test]
    fn load_indexes_declared_provides() {
        let mut m = ModRecord::bare("m1", "m1.jar", "1.0.0");
        m.provides.insert("virtual/thing".into());
        let registry = Registry::load(vec![m], &OverrideTable::new()).unwrap();
        assert_eq!(
            registry.providers_of("virtual/thing").collect::<Vec<_>>(),
            vec![&ModId::new("m1")]
        );
    }

    #[test]
    fn duplicate_id_rejected() {
        let err = Registry::load(
            vec![
                ModRecord::bare("m1", "m1.jar", "1.0.0"),
                ModRecord::bare("m1", "m1-other.jar", "2.0.0"),
            ],
            &OverrideTable::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateId(_)));
    }

    #[test]
    fn override_table_adds_depends_only_when_version_matches() {
        let mut overrides = OverrideTable::new();
        overrides.push(OverrideEntry {
            mod_id: ModId::new("m1"),
            version_predicate: VersionReq::parse("<2.0.0").unwrap(),
            extra_depends: vec![DepEntry::new("m2", VersionReq::parse("*").unwrap())],
            extra_breaks: vec![],
        });

        let registry = Registry::load(
            vec![
                ModRecord::bare("m1", "m1.jar", "1.0.0"),
                ModRecord::bare("m2", "m2.jar", "1.0.0"),
            ],
            &overrides,
        )
        .unwrap();
        assert_eq!(registry.get(&ModId::new("m1")).unwrap().depends.len(), 1);
    }

    #[test]
    fn override_table_skips_when_version_predicate_fails() {
        let mut overrides = OverrideTable::new();
        overrides.push(OverrideEntry {
            mod_id: ModId::new("m1"),
            version_predicate: VersionReq::parse(">=2.0.0").unwrap(),
            extra_depends: vec![DepEntry::new("m2", VersionReq::parse("*").unwrap())],
            extra_breaks: vec![],
        });

        let registry =
            Registry::load(vec![ModRecord::bare("m1", "m1.jar", "1.0.0")], &overrides).unwrap();
        assert!(registry.get(&ModId::new("m1")).unwrap().depends.is_empty());
    }
}
