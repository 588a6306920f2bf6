use thiserror::Error;
use voicegate_voiceprint::ProfileError;

use crate::recorder::RecordError;

/// Errors that abort a capture operation.
///
/// Transcription service failures are deliberately absent: the session
/// absorbs them into a no-text report instead of failing the cycle.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No embedding extractor is configured. Enrollment refuses to run;
    /// verification fails open instead (see the gate).
    #[error("voiceprint model unavailable")]
    ModelUnavailable,

    #[error("record error: {0}")]
    Record(#[from] RecordError),

    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
}
