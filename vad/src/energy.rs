//! Full-buffer energy speech detection.

use voicegate_voiceprint::AudioBuffer;

use crate::SpeechDetector;

/// Default RMS threshold on a [-1, 1] normalized signal.
pub const DEFAULT_ENERGY_THRESHOLD: f32 = 0.01;

/// Computes the root-mean-square amplitude of a sample slice.
/// Returns 0.0 for an empty slice.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// [`SpeechDetector`] that compares full-buffer RMS against a threshold.
#[derive(Debug, Clone)]
pub struct EnergyDetector {
    threshold: f32,
}

impl EnergyDetector {
    /// Creates a detector with the given RMS threshold.
    /// Non-positive thresholds fall back to the default.
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold > 0.0 {
            threshold
        } else {
            DEFAULT_ENERGY_THRESHOLD
        };
        Self { threshold }
    }
}

impl Default for EnergyDetector {
    fn default() -> Self {
        Self::new(DEFAULT_ENERGY_THRESHOLD)
    }
}

impl SpeechDetector for EnergyDetector {
    fn has_speech(&self, audio: &AudioBuffer) -> bool {
        rms(audio.samples()) > self.threshold
    }
}
