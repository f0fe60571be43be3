//! Per-mod, user-controlled status flags and the initial on-disk snapshot.

use std::collections::BTreeMap;

use crate::registry::ModId;

/// The three mutually-constrained, user-controlled flags for one mod.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModStatus {
    pub force_enabled: bool,
    pub force_disabled: bool,
    pub confirmed_good: bool,
}

/// Tracks [`ModStatus`] for every mod plus the enabled/disabled state each
/// mod had on disk at load time, so `Reset` can restore it exactly.
#[derive(Debug, Clone, Default)]
pub struct StatusStore {
    entries: BTreeMap<ModId, ModStatus>,
    initial_enabled: BTreeMap<ModId, bool>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store for a freshly loaded registry, recording each mod's
    /// on-disk enablement at load time.
    pub fn from_initial_state(initial_enabled: BTreeMap<ModId, bool>) -> Self {
        let entries = initial_enabled
            .keys()
            .cloned()
            .map(|id| (id, ModStatus::default()))
            .collect();
        StatusStore {
            entries,
            initial_enabled,
        }
    }

    pub fn status(&self, id: &ModId) -> ModStatus {
        self.entries.get(id).copied().unwrap_or_default()
    }

    pub fn initial_enabled(&self, id: &ModId) -> bool {
        self.initial_enabled.get(id).copied().unwrap_or(false)
    }

    pub fn all_initial_enabled(&self) -> &BTreeMap<ModId, bool> {
        &self.initial_enabled
    }

    /// Toggle `ForceEnabled`, clearing `ForceDisabled` if it was set (the two
    /// flags are mutually exclusive). Calling this twice in a row is the
    /// identity on the store.
    pub fn toggle_force_enable(&mut self, id: &ModId) {
        let entry = self.entries.entry(id.clone()).or_default();
        entry.force_enabled = !entry.force_enabled;
        if entry.force_enabled {
            entry.force_disabled = false;
        }
    }

    /// Toggle `ForceDisabled`, clearing `ForceEnabled` if it was set.
    pub fn toggle_force_disable(&mut self, id: &ModId) {
        let entry = self.entries.entry(id.clone()).or_default();
        entry.force_disabled = !entry.force_disabled;
        if entry.force_disabled {
            entry.force_enabled = false;
        }
    }

    /// Toggle `ConfirmedGood`. Does not touch the enable/disable flags.
    pub fn toggle_confirmed_good(&mut self, id: &ModId) {
        let entry = self.entries.entry(id.clone()).or_default();
        entry.confirmed_good = !entry.confirmed_good;
    }

    pub fn set_confirmed_good(&mut self, id: &ModId, value: bool) {
        self.entries.entry(id.clone()).or_default().confirmed_good = value;
    }

    /// Apply a batch good/not-good update, returning how many ids were
    /// actually changed (an id present in both lists is a no-op for that id
    /// and is not counted).
    pub fn batch_update_good_status(
        &mut self,
        make_good: &[ModId],
        make_not_good: &[ModId],
    ) -> usize {
        let mut changed = 0;
        for id in make_good {
            let entry = self.entries.entry(id.clone()).or_default();
            if !entry.confirmed_good {
                entry.confirmed_good = true;
                changed += 1;
            }
        }
        for id in make_not_good {
            let entry = self.entries.entry(id.clone()).or_default();
            if entry.confirmed_good {
                entry.confirmed_good = false;
                changed += 1;
            }
        }
        changed
    }

    pub fn force_enabled_ids(&self) -> impl Iterator<Item = &ModId> {
        self.entries
            .iter()
            .filter(|(_, status)| status.force_enabled)
            .map(|(id, _)| id)
    }

    pub fn force_disabled_ids(&self) -> impl Iterator<Item = &ModId> {
        self.entries
            .iter()
            .filter(|(_, status)| status.force_disabled)
            .map(|(id, _)| id)
    }

    pub fn confirmed_good_ids(&self) -> impl Iterator<Item = &ModId> {
        self.entries
            .iter()
            .filter(|(_, status)| status.confirmed_good)
            .map(|(id, _)| id)
    }
}
