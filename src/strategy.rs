//! Bisection search strategies.
//!
//! Fast, Partial and Full share one contract (`select_next`/`narrow`) and are
//! represented as a single tagged enum rather than trait objects: they carry
//! no per-variant state beyond the tag itself, and the Bisector is the only
//! caller, so dynamic dispatch buys nothing.

use std::collections::BTreeSet;

use crate::registry::ModId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Fast,
    Partial,
    Full,
}

/// A split of the current search space into two disjoint candidate groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub group_a: BTreeSet<ModId>,
    pub group_b: BTreeSet<ModId>,
}

/// What the Bisector should do after `Feedback` for group A arrives, before
/// group B (if any) has been tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterA {
    /// Test B too before narrowing.
    NeedsB,
    /// A alone was decisive; narrow immediately with this new search space.
    Narrowed(BTreeSet<ModId>),
    /// Neither half explains the issue; user must intervene.
    Inconclusive,
}

/// What the Bisector should do once both A and B answers are known (or, for
/// Partial, once it's been decided a second test isn't needed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterB {
    Narrowed(BTreeSet<ModId>),
    /// Full strategy only: both halves contain an independent culprit; each
    /// becomes its own sub-space to recurse into.
    Split(Vec<BTreeSet<ModId>>),
    Inconclusive,
}

impl Strategy {
    /// Split `search_space` (already sorted, since it's a `BTreeSet`) into
    /// two halves at `ceil(n/2)`.
    pub fn select_next(&self, search_space: &BTreeSet<ModId>) -> Split {
        let n = search_space.len();
        let half = n.div_ceil(2);
        let mut group_a = BTreeSet::new();
        let mut group_b = BTreeSet::new();
        for (i, id) in search_space.iter().enumerate() {
            if i < half {
                group_a.insert(id.clone());
            } else {
                group_b.insert(id.clone());
            }
        }
        Split { group_a, group_b }
    }

    /// Decide what to do once the answer for group A is known, before B (if
    /// any) is tested.
    ///
    /// `issue_with_a` is true when the issue reproduced with A enabled.
    pub fn after_a(&self, split: &Split, issue_with_a: bool) -> AfterA {
        match self {
            Strategy::Fast => AfterA::NeedsB,
            Strategy::Partial => {
                if issue_with_a {
                    // Culprit is within effective-A; B doesn't need testing.
                    AfterA::Narrowed(split.group_a.clone())
                } else {
                    // Issue gone with A disabled's complement on — i.e. A
                    // doesn't explain it alone, but the culprit might still
                    // be split across both halves. Test B to disambiguate.
                    AfterA::NeedsB
                }
            }
            Strategy::Full => AfterA::NeedsB,
        }
    }

    /// Decide the outcome once both A and B answers are known.
    pub fn after_b(&self, split: &Split, issue_with_a: bool, issue_with_b: bool) -> AfterB {
        match self {
            Strategy::Fast => match (issue_with_a, issue_with_b) {
                (true, _) => AfterB::Narrowed(split.group_a.clone()),
                (false, true) => AfterB::Narrowed(split.group_b.clone()),
                (false, false) => AfterB::Inconclusive,
            },
            Strategy::Partial => {
                if issue_with_a {
                    AfterB::Narrowed(split.group_a.clone())
                } else if issue_with_b {
                    AfterB::Narrowed(split.group_b.clone())
                } else {
                    // Neither half alone reproduces it: retain both, the
                    // culprit set may be split across the two halves.
                    let mut combined = split.group_a.clone();
                    combined.extend(split.group_b.iter().cloned());
                    AfterB::Narrowed(combined)
                }
            }
            Strategy::Full => match (issue_with_a, issue_with_b) {
                (true, true) => AfterB::Split(vec![split.group_a.clone(), split.group_b.clone()]),
                (true, false) => AfterB::Narrowed(split.group_a.clone()),
                (false, true) => AfterB::Narrowed(split.group_b.clone()),
                (false, false) => AfterB::Inconclusive,
            },
        }
    }

    /// Whether this strategy ever needs a second (B) test for the given A
    /// answer, without yet deciding the narrowed space — used by the
    /// Bisector to choose its next phase.
    pub fn needs_b(&self, split: &Split, issue_with_a: bool) -> bool {
        matches!(self.after_a(split, issue_with_a), AfterA::NeedsB)
    }
}
