use crate::{AudioBuffer, ExtractionError};

/// Extracts speaker embedding vectors from captured audio.
///
/// The input is one mono 16kHz buffer with samples in [-1, 1]. The output
/// is a dense f32 vector whose length is fixed per implementation and
/// returned by [`VoiceprintModel::dimension`]. Two embeddings are
/// comparable only when produced by the same implementation with the same
/// configuration.
///
/// # Failure Mode
///
/// Extraction fails with [`ExtractionError`] when the buffer is too short,
/// silent or otherwise degenerate for the underlying model.
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use.
pub trait VoiceprintModel: Send + Sync {
    /// Computes a speaker embedding from one audio buffer.
    fn embed(&self, audio: &AudioBuffer) -> Result<Vec<f32>, ExtractionError>;

    /// Returns the embedding vector length (e.g. 80).
    fn dimension(&self) -> usize;
}
