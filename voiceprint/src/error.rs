use thiserror::Error;

/// Errors returned by embedding extraction.
///
/// Extraction failures are fail-closed in verification and skippable in
/// enrollment; the policy lives with the caller, not here.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("audio too short: need at least {min_samples} samples, got {got_samples}")]
    AudioTooShort {
        min_samples: usize,
        got_samples: usize,
    },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("model error: {0}")]
    Model(String),
}

/// Errors returned by voice profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No reference voiceprint is enrolled. Callers decide the policy for
    /// this state; the store only reports it.
    #[error("no reference voiceprint enrolled")]
    Untrained,

    #[error("voiceprint must not be empty")]
    EmptyVoiceprint,

    #[error("dimension mismatch: reference {expected}, candidate {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("threshold must lie in (0, 1), got {0}")]
    InvalidThreshold(f32),

    #[error("storage error: {0}")]
    Storage(#[from] voicegate_kv::KvError),

    #[error("profile record error: {0}")]
    Serialization(String),
}
