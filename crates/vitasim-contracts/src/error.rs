//! Runtime error types for the patient simulation core.
//!
//! All fallible operations in the simulation return `SimResult<T>`.
//! Error variants carry enough context to produce actionable log entries.

use thiserror::Error;

/// The unified error type for the simulation runtime.
#[derive(Debug, Error)]
pub enum SimError {
    /// The scenario id passed to case generation matched no catalog entry.
    ///
    /// Fatal to that call — no partial patient state is created.
    #[error("unknown scenario id '{id}'")]
    UnknownScenario { id: String },

    /// An operation that needs an active case was called while none exists.
    #[error("no active patient case")]
    NoActiveCase,

    /// A phase name stored in the patient state is not defined by the
    /// active scenario. The tick loop logs this and skips the cycle
    /// instead of surfacing it; the variant exists for callers that
    /// validate state explicitly.
    #[error("phase '{phase}' is not defined by scenario '{scenario}'")]
    UnknownPhase { phase: String, scenario: String },

    /// The state store could not load, save, or clear the persisted blob.
    #[error("state store operation failed: {reason}")]
    StoreFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the vitasim crates.
pub type SimResult<T> = Result<T, SimError>;
