use thiserror::Error;
use voicegate_voiceprint::AudioBuffer;

/// Errors returned by the transcription backend.
///
/// The session treats these as non-fatal: the cycle ends with a no-text
/// report and the error is logged, never propagated as a crash.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("recognition service error: {0}")]
    Service(String),

    #[error("invalid recognition response: {0}")]
    InvalidResponse(String),
}

/// Converts accepted audio to text.
///
/// `Ok(None)` means the backend understood no words in the clip, distinct
/// from a service failure and from the upstream silent/rejected outcomes.
pub trait Transcriber: Send + Sync {
    /// Transcribes one audio buffer.
    fn transcribe(&self, audio: &AudioBuffer) -> Result<Option<String>, RecognitionError>;
}
