//! Shared error types for the bisection engine.
//!
//! Every fallible public operation returns [`EngineError`], a `thiserror`
//! enum with one variant per failure described in the spec's error-handling
//! design. Component-local errors ([`crate::resolver::ResolveError`],
//! [`crate::projector::ProjectionError`]) convert into it via `#[from]`.

use thiserror::Error;

use crate::registry::ModId;

/// Discriminant a UI can use to decide how to style an error (error/warning/info).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPath,
    ManifestParseError,
    UnsatisfiedDependency,
    Conflict,
    ForcedDisabledRequired,
    ProjectionFailure,
    IllegalTransition,
    NotInitialized,
}

/// Top-level error type returned by every public Engine API operation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("mods directory {path} is not usable: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("engine has not been initialized with LoadMods yet")]
    NotInitialized,

    #[error(transparent)]
    Resolve(#[from] crate::resolver::ResolveError),

    #[error(transparent)]
    Projection(#[from] crate::projector::ProjectionError),

    #[error(transparent)]
    Registry(#[from] crate::registry::RegistryError),

    #[error("illegal transition: {0}")]
    IllegalTransition(String),

    #[error("mod {0} cannot be force-disabled: it is required by the candidate under test")]
    ForcedDisabledRequired(ModId),
}

impl EngineError {
    /// The discriminant a UI uses to style this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidPath { .. } => ErrorKind::InvalidPath,
            EngineError::NotInitialized => ErrorKind::NotInitialized,
            EngineError::Resolve(crate::resolver::ResolveError::ForcedDisabledRequested(_)) => {
                ErrorKind::ForcedDisabledRequired
            }
            EngineError::Resolve(crate::resolver::ResolveError::UnsatisfiedDependency {
                ..
            }) => ErrorKind::UnsatisfiedDependency,
            EngineError::Resolve(crate::resolver::ResolveError::Conflict { .. }) => {
                ErrorKind::Conflict
            }
            EngineError::Projection(_) => ErrorKind::ProjectionFailure,
            EngineError::Registry(_) => ErrorKind::ManifestParseError,
            EngineError::IllegalTransition(_) => ErrorKind::IllegalTransition,
            EngineError::ForcedDisabledRequired(_) => ErrorKind::ForcedDisabledRequired,
        }
    }
}
