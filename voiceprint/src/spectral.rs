//! Built-in [`VoiceprintModel`] based on pooled mel filterbank statistics.

use crate::audio::AudioBuffer;
use crate::error::ExtractionError;
use crate::fbank::{compute_fbank, l2_normalize, FbankConfig};
use crate::model::VoiceprintModel;

/// Minimum audio length for a meaningful embedding: 400ms at 16kHz.
const MIN_SAMPLES: usize = 6_400;

/// [`VoiceprintModel`] that summarizes a recording by the per-bin mean and
/// standard deviation of its log mel spectrum, L2-normalized.
///
/// # Pipeline
///
/// 1. Audio -> [`compute_fbank`] -> `[frames][num_mels]` log mel features
/// 2. Per-bin mean + standard deviation pooling over all frames
/// 3. Concatenate `[means, stds]` and L2-normalize
///
/// The embedding captures the long-term spectral envelope of a voice. It is
/// far coarser than a neural speaker encoder, but it is deterministic,
/// dependency-free and uses the same trait, so neural extractors can replace
/// it without touching the verification pipeline.
///
/// # Thread Safety
///
/// Stateless after construction; safe for concurrent use.
pub struct SpectralModel {
    cfg: FbankConfig,
}

impl SpectralModel {
    /// Creates a model with the default filterbank configuration (40 mels,
    /// embedding dimension 80).
    pub fn new() -> Self {
        Self::with_config(FbankConfig::default())
    }

    /// Creates a model with a custom filterbank configuration.
    pub fn with_config(cfg: FbankConfig) -> Self {
        Self { cfg }
    }
}

impl Default for SpectralModel {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceprintModel for SpectralModel {
    fn embed(&self, audio: &AudioBuffer) -> Result<Vec<f32>, ExtractionError> {
        let samples = audio.samples();
        if samples.len() < MIN_SAMPLES {
            return Err(ExtractionError::AudioTooShort {
                min_samples: MIN_SAMPLES,
                got_samples: samples.len(),
            });
        }

        let features =
            compute_fbank(samples, &self.cfg).ok_or(ExtractionError::AudioTooShort {
                min_samples: MIN_SAMPLES,
                got_samples: samples.len(),
            })?;

        let num_mels = self.cfg.num_mels;
        let t = features.len() as f64;

        let mut means = vec![0.0f64; num_mels];
        for frame in &features {
            for (m, &v) in frame.iter().enumerate() {
                means[m] += v as f64;
            }
        }
        for m in &mut means {
            *m /= t;
        }

        let mut vars = vec![0.0f64; num_mels];
        for frame in &features {
            for (m, &v) in frame.iter().enumerate() {
                let d = v as f64 - means[m];
                vars[m] += d * d;
            }
        }

        let mut embedding = Vec::with_capacity(2 * num_mels);
        embedding.extend(means.iter().map(|&m| m as f32));
        embedding.extend(vars.iter().map(|&v| (v / t).sqrt() as f32));
        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        2 * self.cfg.num_mels
    }
}
