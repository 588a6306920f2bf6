use std::time::Duration;

use thiserror::Error;
use voicegate_voiceprint::AudioBuffer;

/// Errors returned by audio capture.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("device error: {0}")]
    Device(String),

    #[error("recorder closed")]
    Closed,
}

/// Captures one fixed-duration window of audio.
///
/// `record` blocks until the requested duration has elapsed and returns
/// mono samples at 16kHz normalized to [-1, 1]. Hardware capture lives
/// behind this trait; the pipeline never talks to devices directly.
pub trait Recorder: Send + Sync {
    /// Records for the given duration.
    fn record(&self, duration: Duration) -> Result<AudioBuffer, RecordError>;
}
