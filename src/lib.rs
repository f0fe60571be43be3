//! A dependency-closure bisection engine for narrowing down misbehaving
//! game mods.
//!
//! Given a directory of mod archives (enabled/disabled by filename suffix)
//! and a parsed [`registry::Registry`], the [`bisector::Bisector`] walks the
//! user through a binary-search-style interrogation — propose a subset,
//! materialize it on disk, ask whether the bug still reproduces — until it
//! isolates the minimal set of culprit mods. The search space narrows via a
//! pluggable [`strategy::Strategy`] (`Fast`, `Partial`, `Full`); at each step
//! the candidate subset is expanded into its full dependency closure by
//! [`resolver::resolve`] before being projected onto disk by
//! [`projector::DiskProjector`].
//!
//! The engine itself never touches a filesystem directly: [`projector::ModsFs`]
//! is the sole I/O seam, so the whole state machine can be driven against an
//! in-memory fake in tests.

pub mod bisector;
pub mod error;
pub mod goodlist;
pub mod history;
pub mod projector;
pub mod registry;
pub mod resolver;
pub mod status;
pub mod strategy;
pub mod version_match;

pub use bisector::{Bisector, GroupLabel, LoadOptions, Outcome, Phase, Question};
pub use error::{EngineError, ErrorKind};
pub use registry::{ModId, ModRecord, Registry};
pub use strategy::Strategy;
