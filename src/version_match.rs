//! Version predicate matching.
//!
//! Version predicates follow a semver-range grammar, supplied opaquely by
//! the external manifest parser. The engine never interprets a predicate's
//! syntax directly — it only ever calls [`satisfies`].

use semver::{Version, VersionReq};

/// Test whether `version` satisfies `predicate`.
///
/// This is the sole primitive the resolver uses to evaluate `depends` and
/// `breaks` entries; predicates are otherwise opaque to the engine.
pub fn satisfies(version: &Version, predicate: &VersionReq) -> bool {
    predicate.matches(version)
}
