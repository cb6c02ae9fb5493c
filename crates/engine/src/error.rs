//! Engine error types

use thiserror::Error;

use crate::mode::ModePhase;

/// Engine result type
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine errors
///
/// Everything except `InvalidConfig` is an invariant violation: it never
/// reaches collaborators and goes through [`report_violation`] instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Conflicting switcher request during {phase:?}: {reason}")]
    ConflictingPhaseRequest {
        phase: ModePhase,
        reason: &'static str,
    },

    #[error("Unreachable state: {0}")]
    UnreachableState(String),

    #[error("Texture capture mode already set to {0}")]
    TextureCaptureUnchanged(bool),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Report an invariant violation
///
/// Fatal in debug builds. Release builds log it and carry on; the caller is
/// expected to have left state at the nearest valid phase.
pub fn report_violation(err: &EngineError) {
    if cfg!(debug_assertions) {
        panic!("toolbar invariant violated: {}", err);
    }
    log::warn!("Ignoring toolbar invariant violation: {}", err);
}
