//! Disk-state projector: turns a target effective set into filename renames.
//!
//! The engine proper only ever talks to the [`ModsFs`] trait, so it can be
//! driven against a real directory or an in-memory fake with the same code
//! path (see the `fake` submodule, used by the engine's own tests and by
//! integration tests that want repeatable, on-disk behavior via `tempfile`).

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::registry::{ModId, Registry};

pub const DISABLED_SUFFIX: &str = ".disabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOp {
    Enable,
    Disable,
}

impl fmt::Display for RenameOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameOp::Enable => write!(f, "enable"),
            RenameOp::Disable => write!(f, "disable"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenameFailure {
    pub id: ModId,
    pub operation: RenameOp,
    pub message: String,
}

impl fmt::Display for RenameFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.id, self.operation, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("failed to scan mods directory: {0}")]
    ScanFailed(String),

    #[error("{} of {} renames failed", .failures.len(), .attempted)]
    RenamesFailed {
        attempted: usize,
        failures: Vec<RenameFailure>,
    },
}

/// One observed on-disk file: its stem (without either suffix form) and
/// whether it is currently enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskEntry {
    pub base_filename: String,
    pub enabled: bool,
}

/// Abstraction over "a directory of suffix-toggled files", so the engine can
/// be driven against a real filesystem or an in-memory fake.
pub trait ModsFs {
    fn scan(&self) -> Result<Vec<DiskEntry>, String>;
    fn rename(
        &mut self,
        from_base: &str,
        from_enabled: bool,
        to_enabled: bool,
    ) -> Result<(), String>;
}

/// Real-filesystem implementation rooted at a mods directory.
#[derive(Debug, Clone)]
pub struct RealFs {
    root: PathBuf,
}

impl RealFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        RealFs { root: root.into() }
    }

    fn path_for(&self, base_filename: &str, enabled: bool) -> PathBuf {
        if enabled {
            self.root.join(base_filename)
        } else {
            self.root.join(format!("{base_filename}{DISABLED_SUFFIX}"))
        }
    }
}

impl ModsFs for RealFs {
    fn scan(&self) -> Result<Vec<DiskEntry>, String> {
        let read_dir = std::fs::read_dir(&self.root).map_err(|e| e.to_string())?;
        let mut entries = Vec::new();
        for item in read_dir {
            let item = item.map_err(|e| e.to_string())?;
            if !item.file_type().map_err(|e| e.to_string())?.is_file() {
                continue;
            }
            let name = item.file_name().to_string_lossy().into_owned();
            match name.strip_suffix(DISABLED_SUFFIX) {
                Some(stem) => entries.push(DiskEntry {
                    base_filename: stem.to_string(),
                    enabled: false,
                }),
                None => entries.push(DiskEntry {
                    base_filename: name,
                    enabled: true,
                }),
            }
        }
        Ok(entries)
    }

    fn rename(
        &mut self,
        from_base: &str,
        from_enabled: bool,
        to_enabled: bool,
    ) -> Result<(), String> {
        let from = self.path_for(from_base, from_enabled);
        let to = self.path_for(from_base, to_enabled);
        std::fs::rename(&from, &to).map_err(|e| e.to_string())
    }
}

/// A computed rename plan: which mods need to flip disabled→enabled or
/// enabled→disabled to reach the target effective set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub to_disable: Vec<ModId>,
    pub to_enable: Vec<ModId>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.to_disable.is_empty() && self.to_enable.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplySummary {
    pub disabled: Vec<ModId>,
    pub enabled: Vec<ModId>,
    pub failures: Vec<RenameFailure>,
}

impl ApplySummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct DiskProjector<F: ModsFs> {
    fs: F,
}

impl<F: ModsFs> DiskProjector<F> {
    pub fn new(fs: F) -> Self {
        DiskProjector { fs }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    fn scan_indexed(&self) -> Result<BTreeMap<String, bool>, ProjectionError> {
        let entries = self.fs.scan().map_err(ProjectionError::ScanFailed)?;
        Ok(entries
            .into_iter()
            .map(|e| (e.base_filename, e.enabled))
            .collect())
    }

    /// Compute the rename delta to reach `target`, against current disk state.
    pub fn plan(
        &self,
        target: &std::collections::BTreeSet<ModId>,
        registry: &Registry,
    ) -> Result<Plan, ProjectionError> {
        let disk_state = self.scan_indexed()?;
        let mut plan = Plan::default();
        for id in registry.ids() {
            let Some(record) = registry.get(id) else {
                continue;
            };
            let currently_enabled = disk_state
                .get(&record.base_filename)
                .copied()
                .unwrap_or(false);
            let should_be_enabled = target.contains(id);
            if should_be_enabled && !currently_enabled {
                plan.to_enable.push(id.clone());
            } else if !should_be_enabled && currently_enabled {
                plan.to_disable.push(id.clone());
            }
        }
        Ok(plan)
    }

    /// Apply `target`, disabling first then enabling. Per-file failures are
    /// collected into the summary rather than aborting the remaining renames.
    pub fn apply(
        &mut self,
        target: &std::collections::BTreeSet<ModId>,
        registry: &Registry,
    ) -> Result<ApplySummary, ProjectionError> {
        let plan = self.plan(target, registry)?;
        let mut summary = ApplySummary::default();

        for id in &plan.to_disable {
            let Some(record) = registry.get(id) else {
                continue;
            };
            match self.fs.rename(&record.base_filename, true, false) {
                Ok(()) => {
                    debug!(%id, "projector: disabled");
                    summary.disabled.push(id.clone());
                }
                Err(message) => {
                    warn!(%id, %message, "projector: disable rename failed");
                    summary.failures.push(RenameFailure {
                        id: id.clone(),
                        operation: RenameOp::Disable,
                        message,
                    });
                }
            }
        }

        for id in &plan.to_enable {
            let Some(record) = registry.get(id) else {
                continue;
            };
            match self.fs.rename(&record.base_filename, false, true) {
                Ok(()) => {
                    debug!(%id, "projector: enabled");
                    summary.enabled.push(id.clone());
                }
                Err(message) => {
                    warn!(%id, %message, "projector: enable rename failed");
                    summary.failures.push(RenameFailure {
                        id: id.clone(),
                        operation: RenameOp::Enable,
                        message,
                    });
                }
            }
        }

        Ok(summary)
    }

    /// Current enabled set among the registry's known mods, per disk state.
    pub fn current_enabled(
        &self,
        registry: &Registry,
    ) -> Result<std::collections::BTreeSet<ModId>, ProjectionError> {
        let disk_state = self.scan_indexed()?;
        Ok(registry
            .ids()
            .filter(|id| {
                registry
                    .get(id)
                    .and_then(|r| disk_state.get(&r.base_filename))
                    .copied()
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

impl ApplySummary {
    pub fn into_result(self) -> Result<ApplySummary, ProjectionError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            let attempted = self.disabled.len() + self.enabled.len() + self.failures.len();
            Err(ProjectionError::RenamesFailed {
                attempted,
                failures: self.failures,
            })
        }
    }
}

/// In-memory fake, for engine-level tests that never touch a real filesystem.
pub mod fake {
    use super::*;

    #[derive(Debug, Clone, Default)]
    pub struct InMemoryFs {
        /// base_filename -> enabled
        files: BTreeMap<String, bool>,
    }

    impl InMemoryFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(mut self, base_filename: impl Into<String>, enabled: bool) -> Self {
            self.files.insert(base_filename.into(), enabled);
            self
        }

        pub fn is_enabled(&self, base_filename: &str) -> Option<bool> {
            self.files.get(base_filename).copied()
        }
    }

    impl ModsFs for InMemoryFs {
        fn scan(&self) -> Result<Vec<DiskEntry>, String> {
            Ok(self
                .files
                .iter()
                .map(|(base_filename, &enabled)| DiskEntry {
                    base_filename: base_filename.clone(),
                    enabled,
                })
                .collect())
        }

        fn rename(
            &mut self,
            from_base: &str,
            from_enabled: bool,
            to_enabled: bool,
        ) -> Result<(), String> {
            match self.files.get(from_base) {
                Some(&enabled) if enabled == from_enabled => {
                    self.files.insert(from_base.to_string(), to_enabled);
                    Ok(())
                }
                Some(_) => Err(format!("{from_base} is not in the expected state")),
                None => Err(format!("{from_base} not found")),
            }
        }
    }
}
