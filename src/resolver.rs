//! Dependency-closure resolver.
//!
//! Pure function: turns a candidate "originally enabled" set into the
//! minimal effective set that satisfies every hard requirement and contains
//! no conflicts, or reports why it cannot.

use std::collections::BTreeSet;

use semver::VersionReq;
use thiserror::Error;
use tracing::{debug, warn};

use crate::registry::{ModId, Registry};
use crate::status::StatusStore;
use crate::version_match::satisfies;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{0} is force-disabled but was requested in the candidate set")]
    ForcedDisabledRequested(ModId),

    #[error("{from} depends on '{target}' (predicate {predicate}) but no enabled mod provides it")]
    UnsatisfiedDependency {
        from: ModId,
        target: String,
        predicate: VersionReq,
    },

    #[error("{a} conflicts with {b} (breaks '{target}', predicate {predicate})")]
    Conflict {
        a: ModId,
        b: ModId,
        target: String,
        predicate: VersionReq,
    },
}

/// Resolve `candidate` against `registry`, honoring `status`'s force flags.
///
/// See SPEC_FULL.md §4.1 for the exact closure and conflict-check algorithm.
/// All iteration is over `BTreeSet`/`BTreeMap`, so the result is a
/// deterministic function of its inputs.
pub fn resolve(
    candidate: &BTreeSet<ModId>,
    registry: &Registry,
    status: &StatusStore,
) -> Result<BTreeSet<ModId>, ResolveError> {
    debug!(candidate = ?candidate, "resolver: starting closure");

    let mut effective: BTreeSet<ModId> = candidate.clone();
    for id in status.force_enabled_ids() {
        effective.insert(id.clone());
    }

    for id in status.force_disabled_ids() {
        if candidate.contains(id) {
            warn!(%id, "resolver: force-disabled mod requested in candidate set");
            return Err(ResolveError::ForcedDisabledRequested(id.clone()));
        }
        effective.remove(id);
    }

    // Closure: repeatedly satisfy every `depends` entry of every mod in E.
    loop {
        let mut added = None;

        'search: for id in effective.clone().iter() {
            let Some(record) = registry.get(id) else {
                continue;
            };
            for dep in &record.depends {
                if is_satisfied(&effective, registry, status, &dep.target, &dep.predicate.0) {
                    continue;
                }
                match pick_provider(&effective, registry, status, &dep.target, &dep.predicate.0) {
                    Some(provider) => {
                        added = Some(provider);
                        break 'search;
                    }
                    None => {
                        warn!(
                            %id,
                            target = %dep.target,
                            "resolver: unsatisfied dependency"
                        );
                        return Err(ResolveError::UnsatisfiedDependency {
                            from: id.clone(),
                            target: dep.target.clone(),
                            predicate: dep.predicate.0.clone(),
                        });
                    }
                }
            }
        }

        match added {
            Some(provider) => {
                debug!(%provider, "resolver: pulled in dependency closure step");
                effective.insert(provider);
            }
            None => break,
        }
    }

    // Conflict check: every `breaks` entry of every mod in E must be
    // unsatisfied by the rest of E.
    for id in effective.iter() {
        let Some(record) = registry.get(id) else {
            continue;
        };
        for brk in &record.breaks {
            for other in effective.iter() {
                if other == id {
                    continue;
                }
                let Some(other_record) = registry.get(other) else {
                    continue;
                };
                if other_record.all_provides().any(|p| p == brk.target)
                    && satisfies(&other_record.version, &brk.predicate.0)
                {
                    warn!(a = %id, b = %other, target = %brk.target, "resolver: conflict detected");
                    return Err(ResolveError::Conflict {
                        a: id.clone(),
                        b: other.clone(),
                        target: brk.target.clone(),
                        predicate: brk.predicate.0.clone(),
                    });
                }
            }
        }
    }

    debug!(effective = ?effective, "resolver: closure resolved");
    Ok(effective)
}

fn is_satisfied(
    effective: &BTreeSet<ModId>,
    registry: &Registry,
    status: &StatusStore,
    target: &str,
    predicate: &VersionReq,
) -> bool {
    registry.providers_of(target).any(|id| {
        effective.contains(id)
            && !status.status(id).force_disabled
            && registry
                .get(id)
                .is_some_and(|record| satisfies(&record.version, predicate))
    })
}

/// Pick the provider to add for an unsatisfied `depends` entry: prefer an
/// already-in-E provider, then any non-`ForceDisabled` provider, with stable
/// tie-breaking by lowest id (guaranteed by `providers_of`'s sorted order).
fn pick_provider(
    effective: &BTreeSet<ModId>,
    registry: &Registry,
    status: &StatusStore,
    target: &str,
    predicate: &VersionReq,
) -> Option<ModId> {
    let eligible = || {
        registry.providers_of(target).filter(|id| {
            !status.status(id).force_disabled
                && registry
                    .get(id)
                    .is_some_and(|record| satisfies(&record.version, predicate))
        })
    };

    eligible()
        .find(|id| effective.contains(*id))
        .or_else(|| eligible().next())
        .cloned()
}
