//! Windowed voice-activity detection.

use tracing::warn;
use voicegate_voiceprint::{AudioBuffer, SAMPLE_RATE};

use crate::energy::{rms, DEFAULT_ENERGY_THRESHOLD};
use crate::{SpeechDetector, VadError};

/// Classifies one short analysis window as speech or non-speech.
///
/// Implementations wrap whatever voice-activity backend is deployed.
/// A classification failure marks the window unusable; the detector
/// excludes it from the speech ratio entirely.
pub trait WindowClassifier: Send + Sync {
    /// Returns true when the window contains speech.
    fn classify(&self, window: &[f32]) -> Result<bool, VadError>;
}

/// Configuration for [`WindowedDetector`].
#[derive(Debug, Clone)]
pub struct WindowedConfig {
    /// Analysis window length in milliseconds (default: 30).
    pub window_ms: u32,
    /// Minimum fraction of classified windows that must contain speech
    /// (default: 0.2).
    pub min_ratio: f32,
}

impl Default for WindowedConfig {
    fn default() -> Self {
        Self {
            window_ms: 30,
            min_ratio: 0.2,
        }
    }
}

/// [`SpeechDetector`] that splits the buffer into fixed windows, classifies
/// each independently, and requires a minimum speech-window ratio.
///
/// # Algorithm
///
/// The buffer is cut into `window_ms` windows (a trailing partial window is
/// dropped). Each window goes through the [`WindowClassifier`]; a failed
/// classification removes the window from both numerator and denominator.
/// The result is true iff `speech / classified >= min_ratio` with at least
/// one classified window. Zero analyzable windows is never speech; there
/// is no division by zero.
pub struct WindowedDetector {
    classifier: Box<dyn WindowClassifier>,
    window_samples: usize,
    min_ratio: f32,
}

impl WindowedDetector {
    /// Creates a detector with default configuration (30ms windows, 0.2).
    pub fn new(classifier: Box<dyn WindowClassifier>) -> Self {
        Self::with_config(classifier, WindowedConfig::default())
    }

    /// Creates a detector with the given configuration.
    /// Invalid values fall back to the defaults.
    pub fn with_config(classifier: Box<dyn WindowClassifier>, cfg: WindowedConfig) -> Self {
        let window_ms = if cfg.window_ms > 0 { cfg.window_ms } else { 30 };
        let min_ratio = if cfg.min_ratio > 0.0 && cfg.min_ratio <= 1.0 {
            cfg.min_ratio
        } else {
            0.2
        };
        Self {
            classifier,
            window_samples: (SAMPLE_RATE as usize * window_ms as usize) / 1000,
            min_ratio,
        }
    }
}

impl SpeechDetector for WindowedDetector {
    fn has_speech(&self, audio: &AudioBuffer) -> bool {
        let mut speech = 0usize;
        let mut classified = 0usize;

        for window in audio.samples().chunks_exact(self.window_samples) {
            match self.classifier.classify(window) {
                Ok(is_speech) => {
                    classified += 1;
                    if is_speech {
                        speech += 1;
                    }
                }
                Err(e) => {
                    // Failed windows count on neither side of the ratio.
                    warn!(error = %e, "window classification failed, skipping window");
                }
            }
        }

        if classified == 0 {
            return false;
        }
        speech as f32 / classified as f32 >= self.min_ratio
    }
}

/// Built-in [`WindowClassifier`] using a per-window RMS threshold, so the
/// windowed strategy works without an external voice-activity model.
#[derive(Debug, Clone)]
pub struct EnergyWindowClassifier {
    threshold: f32,
}

impl EnergyWindowClassifier {
    /// Creates a classifier with the given per-window RMS threshold.
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold > 0.0 {
            threshold
        } else {
            DEFAULT_ENERGY_THRESHOLD
        };
        Self { threshold }
    }
}

impl Default for EnergyWindowClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ENERGY_THRESHOLD)
    }
}

impl WindowClassifier for EnergyWindowClassifier {
    fn classify(&self, window: &[f32]) -> Result<bool, VadError> {
        Ok(rms(window) > self.threshold)
    }
}
