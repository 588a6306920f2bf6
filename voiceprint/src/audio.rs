/// Capture sample rate in Hz. Every collaborator in the pipeline produces
/// and consumes mono audio at this rate.
pub const SAMPLE_RATE: u32 = 16_000;

/// One fixed-duration window of mono audio, normalized to [-1, 1].
///
/// Buffers are ephemeral: created per capture cycle, consumed by the
/// pipeline, and dropped when the cycle completes. Nothing retains them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
}

impl AudioBuffer {
    /// Wraps raw samples. The caller guarantees 16kHz mono in [-1, 1].
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// Returns the sample data.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the buffer duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / SAMPLE_RATE as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration() {
        let buf = AudioBuffer::from_samples(vec![0.0; 16_000]);
        assert_eq!(buf.len(), 16_000);
        assert!((buf.duration_secs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty() {
        let buf = AudioBuffer::default();
        assert!(buf.is_empty());
        assert_eq!(buf.duration_secs(), 0.0);
    }
}
