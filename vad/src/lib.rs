//! Speech activity detection for capture gating.
//!
//! Two strategies implement the one [`SpeechDetector`] trait:
//!
//! - [`EnergyDetector`]: full-buffer RMS threshold. Cheap, sensitive to
//!   transient noise.
//! - [`WindowedDetector`]: classifies fixed 30ms windows through an
//!   injected [`WindowClassifier`] and requires a minimum speech-window
//!   ratio. More robust when a per-window classifier is available.
//!
//! A deployment picks one strategy at startup and keeps it; the pipeline
//! never switches strategies at runtime.

mod energy;
mod windowed;

use thiserror::Error;
use voicegate_voiceprint::AudioBuffer;

pub use energy::{rms, EnergyDetector, DEFAULT_ENERGY_THRESHOLD};
pub use windowed::{
    EnergyWindowClassifier, WindowClassifier, WindowedConfig, WindowedDetector,
};

/// Errors surfaced by per-window speech classification.
///
/// The windowed detector absorbs these per window; they never abort a
/// detection pass.
#[derive(Debug, Error)]
pub enum VadError {
    #[error("window classifier error: {0}")]
    Classifier(String),
}

/// Decides whether a captured buffer contains enough speech to be worth
/// processing. No side effects; never panics on malformed input.
pub trait SpeechDetector: Send + Sync {
    /// Returns true when the buffer contains speech.
    /// A buffer yielding zero analyzable windows is never speech.
    fn has_speech(&self, audio: &AudioBuffer) -> bool;
}
