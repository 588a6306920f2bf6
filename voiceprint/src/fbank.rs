//! Log mel filterbank feature extraction.
//!
//! Operates directly on normalized f32 samples as produced by the capture
//! pipeline. Hamming window, per-frame DC removal and pre-emphasis, power
//! spectrum via an in-place Cooley-Tukey FFT, triangular mel filters.

use std::f64::consts::PI;

/// Configures mel filterbank extraction.
///
/// Defaults: 25ms frames, 10ms shift, 40 mel bins over 20-7600 Hz at 16kHz.
#[derive(Debug, Clone)]
pub struct FbankConfig {
    /// Input sample rate in Hz (default: 16000).
    pub sample_rate: usize,
    /// Number of mel filterbank channels (default: 40).
    pub num_mels: usize,
    /// Frame length in samples (default: 400 = 25ms @ 16kHz).
    pub frame_length: usize,
    /// Frame shift in samples (default: 160 = 10ms @ 16kHz).
    pub frame_shift: usize,
    /// Pre-emphasis coefficient (default: 0.97).
    pub pre_emphasis: f64,
    /// Low cutoff frequency for mel bins in Hz (default: 20).
    pub low_freq: f64,
    /// High cutoff frequency in Hz (default: 7600).
    pub high_freq: f64,
    /// Floor applied to mel energies before the log (default: 1e-10).
    pub energy_floor: f64,
}

impl Default for FbankConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            num_mels: 40,
            frame_length: 400,
            frame_shift: 160,
            pre_emphasis: 0.97,
            low_freq: 20.0,
            high_freq: 7600.0,
            energy_floor: 1e-10,
        }
    }
}

/// Extracts log mel filterbank features from normalized mono samples.
///
/// Output is `[num_frames][num_mels]` of log mel energies.
/// Returns `None` if the audio is shorter than a single frame.
pub fn compute_fbank(samples: &[f32], cfg: &FbankConfig) -> Option<Vec<Vec<f32>>> {
    if cfg.frame_length == 0 || cfg.frame_shift == 0 || cfg.num_mels == 0 {
        return None;
    }
    if samples.len() < cfg.frame_length {
        return None;
    }

    let num_frames = (samples.len() - cfg.frame_length) / cfg.frame_shift + 1;
    let fft_size = cfg.frame_length.next_power_of_two();
    let half_fft = fft_size / 2 + 1;

    let window = hamming_window(cfg.frame_length);
    let filterbank = mel_filterbank(
        cfg.num_mels,
        fft_size,
        cfg.sample_rate,
        cfg.low_freq,
        cfg.high_freq.min(cfg.sample_rate as f64 / 2.0),
    );

    let mut features = Vec::with_capacity(num_frames);
    let mut spectrum = vec![(0.0f64, 0.0f64); fft_size];

    for f in 0..num_frames {
        let offset = f * cfg.frame_shift;
        let mut frame: Vec<f64> = samples[offset..offset + cfg.frame_length]
            .iter()
            .map(|&s| s as f64)
            .collect();

        // DC removal keeps offset-biased recordings comparable.
        let mean: f64 = frame.iter().sum::<f64>() / frame.len() as f64;
        for v in &mut frame {
            *v -= mean;
        }

        if cfg.pre_emphasis > 0.0 {
            for i in (1..frame.len()).rev() {
                frame[i] -= cfg.pre_emphasis * frame[i - 1];
            }
            frame[0] *= 1.0 - cfg.pre_emphasis;
        }

        for v in &mut spectrum {
            *v = (0.0, 0.0);
        }
        for (i, &v) in frame.iter().enumerate() {
            spectrum[i] = (v * window[i], 0.0);
        }
        fft(&mut spectrum);

        let power: Vec<f64> = spectrum[..half_fft]
            .iter()
            .map(|&(re, im)| re * re + im * im)
            .collect();

        let mut mels = vec![0.0f32; cfg.num_mels];
        for (m, filter) in filterbank.iter().enumerate() {
            let energy: f64 = filter.iter().zip(&power).map(|(&w, &p)| w * p).sum();
            mels[m] = energy.max(cfg.energy_floor).ln() as f32;
        }
        features.push(mels);
    }

    Some(features)
}

/// L2-normalizes a vector to unit length in-place.
/// Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f64 = v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
    if norm > 0.0 {
        let scale = (1.0 / norm) as f32;
        for x in v.iter_mut() {
            *x *= scale;
        }
    }
}

fn hamming_window(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos())
        .collect()
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Builds `[num_mels][half_fft]` triangular mel filter weights.
fn mel_filterbank(
    num_mels: usize,
    fft_size: usize,
    sample_rate: usize,
    low_freq: f64,
    high_freq: f64,
) -> Vec<Vec<f64>> {
    let half_fft = fft_size / 2 + 1;
    let mel_low = hz_to_mel(low_freq);
    let mel_high = hz_to_mel(high_freq);

    // num_mels + 2 equally spaced points on the mel scale, mapped to bins.
    let bins: Vec<usize> = (0..num_mels + 2)
        .map(|i| {
            let mel = mel_low + i as f64 * (mel_high - mel_low) / (num_mels + 1) as f64;
            let bin = (mel_to_hz(mel) * fft_size as f64 / sample_rate as f64).floor() as isize;
            bin.clamp(0, half_fft as isize - 1) as usize
        })
        .collect();

    let mut fb = Vec::with_capacity(num_mels);
    for m in 0..num_mels {
        let (left, center, right) = (bins[m], bins[m + 1], bins[m + 2]);
        let mut filter = vec![0.0f64; half_fft];
        if center > left {
            for k in left..=center {
                filter[k] = (k - left) as f64 / (center - left) as f64;
            }
        }
        if right > center {
            for k in center..=right {
                filter[k] = (right - k) as f64 / (right - center) as f64;
            }
        }
        fb.push(filter);
    }
    fb
}

/// In-place iterative Cooley-Tukey FFT over (real, imag) pairs.
/// The input length must be a power of two.
fn fft(x: &mut [(f64, f64)]) {
    let n = x.len();
    if n <= 1 {
        return;
    }

    // Bit-reversal reordering.
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            x.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let theta = -2.0 * PI / len as f64;
        let step = (theta.cos(), theta.sin());
        for chunk in x.chunks_mut(len) {
            let mut w = (1.0f64, 0.0f64);
            for k in 0..half {
                let a = chunk[k];
                let b = chunk[k + half];
                let t = (w.0 * b.0 - w.1 * b.1, w.0 * b.1 + w.1 * b.0);
                chunk[k] = (a.0 + t.0, a.1 + t.1);
                chunk[k + half] = (a.0 - t.0, a.1 - t.1);
                w = (w.0 * step.0 - w.1 * step.1, w.0 * step.1 + w.1 * step.0);
            }
        }
        len <<= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f64, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (freq_hz * 2.0 * PI * i as f64 / 16_000.0).sin() as f32 * 0.5)
            .collect()
    }

    #[test]
    fn config_default() {
        let cfg = FbankConfig::default();
        assert_eq!(cfg.sample_rate, 16_000);
        assert_eq!(cfg.num_mels, 40);
        assert_eq!(cfg.frame_length, 400);
        assert_eq!(cfg.frame_shift, 160);
    }

    #[test]
    fn too_short_is_none() {
        let cfg = FbankConfig::default();
        assert!(compute_fbank(&vec![0.0; 100], &cfg).is_none());
    }

    #[test]
    fn frame_count() {
        let cfg = FbankConfig::default();
        // (800 - 400) / 160 + 1 = 3 frames.
        let features = compute_fbank(&vec![0.0; 800], &cfg).unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].len(), 40);
    }

    #[test]
    fn tone_produces_varied_mels() {
        let cfg = FbankConfig::default();
        let features = compute_fbank(&sine(440.0, 16_000), &cfg).unwrap();
        assert_eq!(features.len(), (16_000 - 400) / 160 + 1);

        let frame = &features[10];
        let varied = frame.windows(2).any(|w| (w[0] - w[1]).abs() > 0.01);
        assert!(varied, "tone should produce non-uniform mel energies");
    }

    #[test]
    fn different_tones_differ() {
        let cfg = FbankConfig::default();
        let low = compute_fbank(&sine(220.0, 8000), &cfg).unwrap();
        let high = compute_fbank(&sine(3000.0, 8000), &cfg).unwrap();

        let diff: f32 = low[5]
            .iter()
            .zip(&high[5])
            .map(|(a, b)| (a - b).abs())
            .sum();
        assert!(diff > 1.0, "spectrally distinct tones, got total diff {diff}");
    }

    #[test]
    fn l2_normalize_unit() {
        let mut v = vec![3.0f32, 4.0];
        l2_normalize(&mut v);
        let norm: f64 = v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn l2_normalize_zero_untouched() {
        let mut v = vec![0.0f32; 4];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0; 4]);
    }

    #[test]
    fn fft_impulse() {
        // FFT of an impulse is flat.
        let mut buf = vec![(1.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0)];
        fft(&mut buf);
        for &(re, im) in &buf {
            assert!((re - 1.0).abs() < 1e-10);
            assert!(im.abs() < 1e-10);
        }
    }

    #[test]
    fn fft_parseval() {
        // Parseval: sum |x[n]|^2 * N == sum |X[k]|^2.
        let n = 16;
        let mut buf: Vec<(f64, f64)> = (0..n)
            .map(|i| ((2.0 * PI * i as f64 / n as f64).sin(), 0.0))
            .collect();
        let time_energy: f64 = buf.iter().map(|(r, im)| r * r + im * im).sum();
        fft(&mut buf);
        let freq_energy: f64 = buf.iter().map(|(r, im)| r * r + im * im).sum();
        assert!((time_energy * n as f64 - freq_energy).abs() < 1e-8);
    }

    #[test]
    fn mel_hz_roundtrip() {
        for &hz in &[0.0, 100.0, 440.0, 1000.0, 7600.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            assert!((hz - back).abs() < 1e-6, "roundtrip failed for {hz}: {back}");
        }
    }
}
