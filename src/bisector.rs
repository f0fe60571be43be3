//! The top-level state machine mediating strategy, resolver, and projector.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::error::EngineError;
use crate::history::{History, HistoryFrame};
use crate::projector::{ApplySummary, DiskProjector, ModsFs};
use crate::registry::{ModId, OverrideTable, Registry};
use crate::resolver::resolve;
use crate::status::StatusStore;
use crate::strategy::{AfterA, AfterB, Split, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PrepareA,
    TestingA,
    TestingB,
    Concluded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupLabel {
    A,
    B,
}

/// A single candidate group presented to the user for testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub group: GroupLabel,
    pub original: BTreeSet<ModId>,
    pub effective: BTreeSet<ModId>,
}

/// Result of `Step` or `ProcessFeedback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Question(Question),
    Concluded,
    /// The strategy could not find a decisive answer from the feedback
    /// given (Fast/Full "issue gone in both") or a contradiction in
    /// Partial's bookkeeping; the caller must intervene (force-enable,
    /// force-disable or mark mods confirmed-good) before stepping again.
    Inconclusive,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub strategy: Strategy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            strategy: Strategy::Fast,
        }
    }
}

struct LoadedState<F: ModsFs> {
    registry: Registry,
    status: StatusStore,
    search_space: BTreeSet<ModId>,
    work_list: Vec<BTreeSet<ModId>>,
    phase: Phase,
    strategy: Strategy,
    split: Option<Split>,
    group_a_effective: Option<BTreeSet<ModId>>,
    group_b_effective: Option<BTreeSet<ModId>>,
    last_issue_a: Option<bool>,
    culprits: BTreeSet<ModId>,
    history: History,
    iteration: usize,
    projector: DiskProjector<F>,
}

/// Top-level engine. Rejects every operation with [`EngineError::NotInitialized`]
/// until [`Bisector::load_mods`] succeeds.
pub struct Bisector<F: ModsFs> {
    state: Option<LoadedState<F>>,
}

impl<F: ModsFs> Default for Bisector<F> {
    fn default() -> Self {
        Bisector { state: None }
    }
}

impl<F: ModsFs> Bisector<F> {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<&LoadedState<F>, EngineError> {
        self.state.as_ref().ok_or(EngineError::NotInitialized)
    }

    fn state_mut(&mut self) -> Result<&mut LoadedState<F>, EngineError> {
        self.state.as_mut().ok_or(EngineError::NotInitialized)
    }

    /// Publish a freshly parsed registry and take ownership of `fs`.
    /// Scans `fs` once to capture the initial on-disk enablement.
    pub fn load_mods(
        &mut self,
        fs: F,
        records: Vec<crate::registry::ModRecord>,
        overrides: &OverrideTable,
        options: LoadOptions,
    ) -> Result<(), EngineError> {
        let registry = Registry::load(records, overrides)?;
        let projector = DiskProjector::new(fs);
        let currently_enabled = scan_or_invalid(&projector, &registry)?;
        let initial_enabled = registry
            .ids()
            .map(|id| (id.clone(), currently_enabled.contains(id)))
            .collect();
        let status = StatusStore::from_initial_state(initial_enabled);
        let search_space: BTreeSet<ModId> = registry.ids().cloned().collect();
        let phase = if search_space.is_empty() {
            Phase::Concluded
        } else {
            Phase::PrepareA
        };

        info!(
            mods = search_space.len(),
            strategy = ?options.strategy,
            "bisector: loaded mods, phase -> {:?}",
            phase
        );

        self.state = Some(LoadedState {
            registry,
            status,
            search_space,
            work_list: Vec::new(),
            phase,
            strategy: options.strategy,
            split: None,
            group_a_effective: None,
            group_b_effective: None,
            last_issue_a: None,
            culprits: BTreeSet::new(),
            history: History::new(),
            iteration: 0,
            projector,
        });
        Ok(())
    }

    pub fn step(&mut self) -> Result<Outcome, EngineError> {
        {
            let s = self.state()?;
            if s.phase != Phase::PrepareA {
                return Err(EngineError::IllegalTransition(
                    "Step is only valid from PrepareA".into(),
                ));
            }
        }
        self.step_from_prepare()
    }

    fn step_from_prepare(&mut self) -> Result<Outcome, EngineError> {
        let s = self.state_mut()?;

        if s.search_space.is_empty() {
            s.phase = Phase::Concluded;
            return Ok(Outcome::Concluded);
        }

        let split = s.strategy.select_next(&s.search_space);
        let (effective_a, split) = match resolve(&split.group_a, &s.registry, &s.status) {
            Ok(effective) => (effective, split),
            Err(first_err) => match resolve(&split.group_b, &s.registry, &s.status) {
                Ok(effective) => (
                    effective,
                    Split {
                        group_a: split.group_b,
                        group_b: split.group_a,
                    },
                ),
                Err(_) => return Err(EngineError::Resolve(first_err)),
            },
        };

        let disk_target = scan_or_invalid(&s.projector, &s.registry)?;
        s.history.push(HistoryFrame {
            search_space: s.search_space.clone(),
            work_list: s.work_list.clone(),
            phase: Phase::PrepareA,
            group_a: None,
            group_b: None,
            culprits: s.culprits.clone(),
            status: s.status.clone(),
            strategy: s.strategy,
            iteration: s.iteration,
            disk_target,
        });

        apply_or_fail(&mut s.projector, &effective_a, &s.registry)?;

        s.iteration += 1;
        s.group_a_effective = Some(effective_a.clone());
        s.group_b_effective = None;
        s.last_issue_a = None;
        let original = split.group_a.clone();
        s.split = Some(split);
        s.phase = Phase::TestingA;

        info!(
            iteration = s.iteration,
            effective = ?effective_a,
            "bisector: phase -> TestingA"
        );

        Ok(Outcome::Question(Question {
            group: GroupLabel::A,
            original,
            effective: effective_a,
        }))
    }

    pub fn process_feedback(&mut self, issue_occurred: bool) -> Result<Outcome, EngineError> {
        let phase = self.state()?.phase;
        match phase {
            Phase::TestingA => self.feedback_for_a(issue_occurred),
            Phase::TestingB => self.feedback_for_b(issue_occurred),
            _ => Err(EngineError::IllegalTransition(
                "Feedback is only valid from TestingA or TestingB".into(),
            )),
        }
    }

    fn feedback_for_a(&mut self, issue_occurred: bool) -> Result<Outcome, EngineError> {
        let s = self.state_mut()?;
        let split = s.split.clone().expect("TestingA implies a split exists");

        match s.strategy.after_a(&split, issue_occurred) {
            AfterA::NeedsB => {
                s.last_issue_a = Some(issue_occurred);
                let effective_b = match resolve(&split.group_b, &s.registry, &s.status) {
                    Ok(effective) => effective,
                    Err(e) => return Err(EngineError::Resolve(e)),
                };

                let disk_target = scan_or_invalid(&s.projector, &s.registry)?;
                s.history.push(HistoryFrame {
                    search_space: s.search_space.clone(),
                    work_list: s.work_list.clone(),
                    phase: Phase::TestingA,
                    group_a: Some(split.group_a.clone()),
                    group_b: Some(split.group_b.clone()),
                    culprits: s.culprits.clone(),
                    status: s.status.clone(),
                    strategy: s.strategy,
                    iteration: s.iteration,
                    disk_target,
                });

                apply_or_fail(&mut s.projector, &effective_b, &s.registry)?;
                s.group_b_effective = Some(effective_b.clone());
                s.phase = Phase::TestingB;

                info!(effective = ?effective_b, "bisector: phase -> TestingB");

                Ok(Outcome::Question(Question {
                    group: GroupLabel::B,
                    original: split.group_b.clone(),
                    effective: effective_b,
                }))
            }
            AfterA::Narrowed(new_space) => self.finish_narrow(new_space),
            AfterA::Inconclusive => {
                let s = self.state_mut()?;
                s.phase = Phase::PrepareA;
                info!("bisector: inconclusive after group A, phase -> PrepareA");
                Ok(Outcome::Inconclusive)
            }
        }
    }

    fn feedback_for_b(&mut self, issue_occurred: bool) -> Result<Outcome, EngineError> {
        let s = self.state_mut()?;
        let split = s.split.clone().expect("TestingB implies a split exists");
        let issue_with_a = s
            .last_issue_a
            .expect("TestingB implies group A was already answered");

        match s.strategy.after_b(&split, issue_with_a, issue_occurred) {
            AfterB::Narrowed(new_space) => self.finish_narrow(new_space),
            AfterB::Split(sub_spaces) => {
                let s = self.state_mut()?;
                let mut spaces = sub_spaces.into_iter();
                let first = spaces.next().unwrap_or_default();
                s.work_list.extend(spaces);
                self.finish_narrow(first)
            }
            AfterB::Inconclusive => {
                let s = self.state_mut()?;
                s.phase = Phase::PrepareA;
                info!("bisector: inconclusive after group B, phase -> PrepareA");
                Ok(Outcome::Inconclusive)
            }
        }
    }

    /// Shared tail of both feedback branches: accept a newly narrowed space,
    /// extract a singleton culprit if the search has bottomed out, pull the
    /// next work-list entry if the current space is now empty, and either
    /// conclude or advance straight to the next question.
    fn finish_narrow(&mut self, new_space: BTreeSet<ModId>) -> Result<Outcome, EngineError> {
        let s = self.state_mut()?;
        let mut space = new_space;

        if space.len() == 1 {
            let id = space.iter().next().expect("len == 1").clone();
            info!(%id, "bisector: isolated culprit");
            s.culprits.insert(id);
            space.clear();
        }

        if space.is_empty() {
            space = s.work_list.pop().unwrap_or_default();
        }

        s.search_space = space;
        s.group_a_effective = None;
        s.group_b_effective = None;
        s.split = None;
        s.last_issue_a = None;

        if s.search_space.is_empty() && s.work_list.is_empty() {
            s.phase = Phase::Concluded;
            info!(culprits = ?s.culprits, "bisector: phase -> Concluded");
            return Ok(Outcome::Concluded);
        }

        s.phase = Phase::PrepareA;
        self.step_from_prepare()
    }

    pub fn undo(&mut self) -> Result<(), EngineError> {
        let s = self.state_mut()?;
        let frame = s
            .history
            .pop()
            .ok_or_else(|| EngineError::IllegalTransition("no history to undo".into()))?;
        debug!(restoring_phase = ?frame.phase, "bisector: undo");

        s.search_space = frame.search_space;
        s.work_list = frame.work_list;
        s.phase = frame.phase;
        s.culprits = frame.culprits;
        s.status = frame.status;
        s.strategy = frame.strategy;
        s.iteration = frame.iteration;
        s.split = match (frame.group_a, frame.group_b) {
            (Some(a), Some(b)) => Some(Split {
                group_a: a,
                group_b: b,
            }),
            (Some(a), None) => Some(Split {
                group_a: a,
                group_b: BTreeSet::new(),
            }),
            (None, Some(b)) => Some(Split {
                group_a: BTreeSet::new(),
                group_b: b,
            }),
            (None, None) => None,
        };
        s.group_a_effective = None;
        s.group_b_effective = None;
        s.last_issue_a = None;

        apply_or_fail(&mut s.projector, &frame.disk_target, &s.registry)?;
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), EngineError> {
        debug!("bisector: reset");
        let s = self.state_mut()?;
        s.history.clear();
        s.culprits.clear();
        s.phase = Phase::PrepareA;
        s.split = None;
        s.group_a_effective = None;
        s.group_b_effective = None;
        s.last_issue_a = None;
        s.work_list.clear();
        s.iteration = 0;

        s.search_space = s
            .registry
            .ids()
            .filter(|id| {
                let status = s.status.status(id);
                !status.force_enabled && !status.force_disabled && !status.confirmed_good
            })
            .cloned()
            .collect();
        if s.search_space.is_empty() {
            s.phase = Phase::Concluded;
        }

        let initial_target: BTreeSet<ModId> = s
            .registry
            .ids()
            .filter(|id| s.status.initial_enabled(id))
            .cloned()
            .collect();
        apply_or_fail(&mut s.projector, &initial_target, &s.registry)?;
        Ok(())
    }

    fn currently_required(&self, id: &ModId) -> bool {
        self.state.as_ref().is_some_and(|s| {
            s.group_a_effective.as_ref().is_some_and(|g| g.contains(id))
                || s.group_b_effective.as_ref().is_some_and(|g| g.contains(id))
        })
    }

    pub fn toggle_force_enable(&mut self, id: &ModId) -> Result<(), EngineError> {
        let s = self.state_mut()?;
        s.status.toggle_force_enable(id);
        Self::sync_search_space_membership(s, id);
        Ok(())
    }

    pub fn toggle_force_disable(&mut self, id: &ModId) -> Result<(), EngineError> {
        if self.currently_required(id) && !self.state()?.status.status(id).force_disabled {
            return Err(EngineError::ForcedDisabledRequired(id.clone()));
        }
        let s = self.state_mut()?;
        s.status.toggle_force_disable(id);
        Self::sync_search_space_membership(s, id);
        Ok(())
    }

    pub fn toggle_confirmed_good(&mut self, id: &ModId) -> Result<(), EngineError> {
        let s = self.state_mut()?;
        s.status.toggle_confirmed_good(id);
        Self::sync_search_space_membership(s, id);
        Ok(())
    }

    pub fn batch_update_good_status(
        &mut self,
        make_good: &[ModId],
        make_not_good: &[ModId],
    ) -> Result<usize, EngineError> {
        let s = self.state_mut()?;
        let changed = s.status.batch_update_good_status(make_good, make_not_good);
        for id in make_good.iter().chain(make_not_good) {
            Self::sync_search_space_membership(s, id);
        }
        Ok(changed)
    }

    fn sync_search_space_membership(s: &mut LoadedState<F>, id: &ModId) {
        if !s.registry.contains(id) {
            return;
        }
        let status = s.status.status(id);
        let excluded = status.force_enabled || status.force_disabled || status.confirmed_good;
        let is_culprit = s.culprits.contains(id);
        if excluded || is_culprit {
            s.search_space.remove(id);
            if s.phase == Phase::PrepareA && s.search_space.is_empty() {
                s.phase = Phase::Concluded;
            }
        } else if s.phase == Phase::PrepareA || s.phase == Phase::Concluded {
            s.search_space.insert(id.clone());
            if s.phase == Phase::Concluded {
                s.phase = Phase::PrepareA;
            }
        }
    }

    pub fn current_phase(&self) -> Result<Phase, EngineError> {
        Ok(self.state()?.phase)
    }

    pub fn iteration_count(&self) -> Result<usize, EngineError> {
        Ok(self.state()?.iteration)
    }

    pub fn search_space(&self) -> Result<&BTreeSet<ModId>, EngineError> {
        Ok(&self.state()?.search_space)
    }

    pub fn culprits(&self) -> Result<&BTreeSet<ModId>, EngineError> {
        Ok(&self.state()?.culprits)
    }

    pub fn group_a_original(&self) -> Result<Option<&BTreeSet<ModId>>, EngineError> {
        Ok(self.state()?.split.as_ref().map(|s| &s.group_a))
    }

    pub fn group_a_effective(&self) -> Result<Option<&BTreeSet<ModId>>, EngineError> {
        Ok(self.state()?.group_a_effective.as_ref())
    }

    pub fn group_b_original(&self) -> Result<Option<&BTreeSet<ModId>>, EngineError> {
        Ok(self.state()?.split.as_ref().map(|s| &s.group_b))
    }

    pub fn group_b_effective(&self) -> Result<Option<&BTreeSet<ModId>>, EngineError> {
        Ok(self.state()?.group_b_effective.as_ref())
    }

    pub fn registry(&self) -> Result<&Registry, EngineError> {
        Ok(&self.state()?.registry)
    }

    pub fn status_store(&self) -> Result<&StatusStore, EngineError> {
        Ok(&self.state()?.status)
    }
}

/// Scan the disk through `projector`, mapping an unreadable/missing mods
/// directory to `InvalidPath` rather than the generic projection error —
/// it's a precondition failure, not a rename failure.
fn scan_or_invalid<F: ModsFs>(
    projector: &DiskProjector<F>,
    registry: &Registry,
) -> Result<BTreeSet<ModId>, EngineError> {
    projector.current_enabled(registry).map_err(|e| match e {
        crate::projector::ProjectionError::ScanFailed(reason) => EngineError::InvalidPath {
            path: "mods directory".to_string(),
            reason,
        },
        other => EngineError::Projection(other),
    })
}

fn apply_or_fail<F: ModsFs>(
    projector: &mut DiskProjector<F>,
    target: &BTreeSet<ModId>,
    registry: &Registry,
) -> Result<ApplySummary, EngineError> {
    let summary = projector.apply(target, registry)?;
    summary.clone().into_result()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::fake::InMemoryFs;
    use crate::registry::{DepEntry, ModRecord};
    use semver::VersionReq;

    fn fs_with(ids: &[&str]) -> InMemoryFs {
        let mut fs = InMemoryFs::new();
        for id in ids {
            fs = fs.with_file(format!("{id}.jar"), true);
        }
        fs
    }

    fn bare_records(ids: &[&str]) -> Vec<ModRecord> {
        ids.iter()
            .map(|id| ModRecord::bare(*id, format!("{id}.jar"), "1.0.0"))
            .collect()
    }

    #[test]
    fn empty_registry_concludes_immediately() {
        let mut bisector = Bisector::new();
        bisector
            .load_mods(
                InMemoryFs::new(),
                vec![],
                &OverrideTable::new(),
                LoadOptions::default(),
            )
            .unwrap();
        assert_eq!(bisector.current_phase().unwrap(), Phase::Concluded);
    }

    #[test]
    fn scenario_one_fast_strategy_isolates_single_culprit() {
        let ids = ["m1", "m2", "m3", "m4"];
        let mut bisector = Bisector::new();
        bisector
            .load_mods(
                fs_with(&ids),
                bare_records(&ids),
                &OverrideTable::new(),
                LoadOptions {
                    strategy: Strategy::Fast,
                },
            )
            .unwrap();

        // Iteration 1: A = {m1,m2}, B = {m3,m4}; issue persists with A,
        // gone with B => narrow to {m1,m2}.
        let outcome = bisector.step().unwrap();
        assert!(matches!(outcome, Outcome::Question(_)));
        let outcome = bisector.process_feedback(true).unwrap();
        assert!(matches!(outcome, Outcome::Question(_)));
        let outcome = bisector.process_feedback(false).unwrap();
        // Narrowed to {m1,m2}, auto-advances straight into iteration 2's question.
        assert!(matches!(outcome, Outcome::Question(_)));

        // Iteration 2: A = {m1}, B = {m2}; issue gone with A, persists with B.
        let outcome = bisector.process_feedback(false).unwrap();
        assert!(matches!(outcome, Outcome::Question(_)));
        let outcome = bisector.process_feedback(true).unwrap();
        assert_eq!(outcome, Outcome::Concluded);

        assert_eq!(
            bisector.culprits().unwrap(),
            &[ModId::new("m2")].into_iter().collect()
        );
    }

    #[test]
    fn scenario_two_dependency_pulled_into_effective_set() {
        let mut m1 = ModRecord::bare("m1", "m1.jar", "1.0.0");
        m1.depends
            .push(DepEntry::new("m2", VersionReq::parse("*").unwrap()));
        let records = vec![
            m1,
            ModRecord::bare("m2", "m2.jar", "1.0.0"),
            ModRecord::bare("m3", "m3.jar", "1.0.0"),
        ];
        let fs = fs_with(&["m1", "m2", "m3"]);

        let mut bisector = Bisector::new();
        bisector
            .load_mods(fs, records, &OverrideTable::new(), LoadOptions::default())
            .unwrap();

        let outcome = bisector.step().unwrap();
        let Outcome::Question(question) = outcome else {
            panic!("expected a question");
        };
        assert!(question.effective.contains(&ModId::new("m1")));
    }

    #[test]
    fn undo_restores_pre_step_state() {
        let ids = ["m1", "m2"];
        let mut bisector = Bisector::new();
        bisector
            .load_mods(
                fs_with(&ids),
                bare_records(&ids),
                &OverrideTable::new(),
                LoadOptions::default(),
            )
            .unwrap();

        let before = bisector.search_space().unwrap().clone();
        bisector.step().unwrap();
        assert_ne!(bisector.current_phase().unwrap(), Phase::PrepareA);

        bisector.undo().unwrap();
        assert_eq!(bisector.current_phase().unwrap(), Phase::PrepareA);
        assert_eq!(bisector.search_space().unwrap(), &before);
    }

    #[test]
    fn undo_from_testing_b_then_feedback_does_not_panic() {
        let ids = ["m1", "m2", "m3", "m4"];
        let mut bisector = Bisector::new();
        bisector
            .load_mods(
                fs_with(&ids),
                bare_records(&ids),
                &OverrideTable::new(),
                LoadOptions {
                    strategy: Strategy::Fast,
                },
            )
            .unwrap();

        bisector.step().unwrap();
        bisector.process_feedback(true).unwrap();
        assert_eq!(bisector.current_phase().unwrap(), Phase::TestingB);

        // The history frame recorded just before entering TestingB restores
        // back to TestingA with the split that produced it intact.
        bisector.undo().unwrap();
        assert_eq!(bisector.current_phase().unwrap(), Phase::TestingA);

        // Re-entering feedback_for_a must not panic on a missing split.
        let outcome = bisector.process_feedback(true).unwrap();
        assert!(matches!(outcome, Outcome::Question(_)));
    }

    #[test]
    fn undo_with_empty_history_is_illegal_transition() {
        let ids = ["m1"];
        let mut bisector = Bisector::new();
        bisector
            .load_mods(
                fs_with(&ids),
                bare_records(&ids),
                &OverrideTable::new(),
                LoadOptions::default(),
            )
            .unwrap();
        let err = bisector.undo().unwrap_err();
        assert!(matches!(err, EngineError::IllegalTransition(_)));
    }

    #[test]
    fn reset_restores_initial_disk_state_and_clears_culprits() {
        let ids = ["m1", "m2", "m3", "m4"];
        let mut bisector = Bisector::new();
        bisector
            .load_mods(
                fs_with(&ids),
                bare_records(&ids),
                &OverrideTable::new(),
                LoadOptions {
                    strategy: Strategy::Fast,
                },
            )
            .unwrap();

        bisector.step().unwrap();
        bisector.process_feedback(true).unwrap();
        bisector.process_feedback(false).unwrap();

        bisector.reset().unwrap();
        assert_eq!(bisector.current_phase().unwrap(), Phase::PrepareA);
        assert!(bisector.culprits().unwrap().is_empty());
        assert_eq!(bisector.search_space().unwrap().len(), 4);
    }

    #[test]
    fn feedback_rejected_outside_testing_phase() {
        let ids = ["m1"];
        let mut bisector = Bisector::new();
        bisector
            .load_mods(
                fs_with(&ids),
                bare_records(&ids),
                &OverrideTable::new(),
                LoadOptions::default(),
            )
            .unwrap();
        let err = bisector.process_feedback(true).unwrap_err();
        assert!(matches!(err, EngineError::IllegalTransition(_)));
    }

    #[test]
    fn unreadable_mods_directory_surfaces_invalid_path() {
        use crate::projector::RealFs;

        let fs = RealFs::new("/nonexistent/definitely/not/a/mods/dir");
        let mut bisector: Bisector<RealFs> = Bisector::new();
        let err = bisector
            .load_mods(
                fs,
                bare_records(&["m1"]),
                &OverrideTable::new(),
                LoadOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPath { .. }));
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidPath);
    }

    #[test]
    fn force_disable_required_mod_is_rejected() {
        let ids = ["m1", "m2"];
        let mut bisector = Bisector::new();
        bisector
            .load_mods(
                fs_with(&ids),
                bare_records(&ids),
                &OverrideTable::new(),
                LoadOptions::default(),
            )
            .unwrap();
        bisector.step().unwrap();
        let group_a = bisector.group_a_effective().unwrap().unwrap().clone();
        let required = group_a.iter().next().unwrap().clone();
        let err = bisector.toggle_force_disable(&required).unwrap_err();
        assert!(matches!(err, EngineError::ForcedDisabledRequired(_)));
    }

    #[test]
    fn operations_before_load_are_not_initialized() {
        let mut bisector: Bisector<InMemoryFs> = Bisector::new();
        assert!(matches!(
            bisector.step().unwrap_err(),
            EngineError::NotInitialized
        ));
    }

    #[test]
    fn toggle_confirmed_good_removes_from_search_space() {
        let ids = ["m1", "m2"];
        let mut bisector = Bisector::new();
        bisector
            .load_mods(
                fs_with(&ids),
                bare_records(&ids),
                &OverrideTable::new(),
                LoadOptions::default(),
            )
            .unwrap();
        bisector.toggle_confirmed_good(&ModId::new("m1")).unwrap();
        assert!(!bisector.search_space().unwrap().contains(&ModId::new("m1")));
    }

    #[test]
    fn all_confirmed_good_concludes() {
        let ids = ["m1", "m2"];
        let mut bisector = Bisector::new();
        bisector
            .load_mods(
                fs_with(&ids),
                bare_records(&ids),
                &OverrideTable::new(),
                LoadOptions::default(),
            )
            .unwrap();
        bisector.toggle_confirmed_good(&ModId::new("m1")).unwrap();
        bisector.toggle_confirmed_good(&ModId::new("m2")).unwrap();
        assert_eq!(bisector.current_phase().unwrap(), Phase::Concluded);
    }
}
