//! Enrollment: build a reference voiceprint from multiple samples.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use voicegate_voiceprint::{ProfileStore, VoiceprintModel};

use crate::error::CaptureError;
use crate::recorder::Recorder;

/// Default enrollment prompts, read aloud one per recording round.
pub const DEFAULT_PROMPTS: [&str; 3] = [
    "Hello, this is my voice",
    "The quick brown fox jumps over the lazy dog",
    "Testing one two three",
];

/// Minimum number of successfully extracted samples for a valid profile.
/// Averaging at least two utterances damps one noisy or atypical take.
const MIN_SAMPLES: usize = 2;

/// Records one sample per prompt, extracts embeddings, and commits their
/// element-wise mean as the new reference voiceprint.
///
/// Individual extraction failures are logged and skipped. With fewer than
/// two usable samples the whole enrollment fails and the existing profile
/// is left untouched; a failed enrollment never corrupts a trained one.
/// Returns `Ok(true)` when a new profile was committed.
pub(crate) fn run(
    model: &Arc<dyn VoiceprintModel>,
    store: &ProfileStore,
    recorder: &dyn Recorder,
    prompts: &[String],
    sample_duration: Duration,
) -> Result<bool, CaptureError> {
    let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(prompts.len());

    for (i, prompt) in prompts.iter().enumerate() {
        info!(sample = i + 1, total = prompts.len(), %prompt, "recording enrollment sample");
        let audio = recorder.record(sample_duration)?;

        match model.embed(&audio) {
            Ok(embedding) => {
                if let Some(first) = embeddings.first() {
                    if embedding.len() != first.len() {
                        warn!(
                            expected = first.len(),
                            got = embedding.len(),
                            "embedding dimension mismatch, skipping sample"
                        );
                        continue;
                    }
                }
                embeddings.push(embedding);
            }
            Err(e) => {
                warn!(sample = i + 1, error = %e, "extraction failed, skipping sample");
            }
        }
    }

    if embeddings.len() < MIN_SAMPLES {
        info!(
            usable = embeddings.len(),
            needed = MIN_SAMPLES,
            "not enough usable samples, profile unchanged"
        );
        return Ok(false);
    }

    let reference = mean(&embeddings);
    store.save(&reference)?;
    info!(samples = embeddings.len(), dim = reference.len(), "voice profile enrolled");
    Ok(true)
}

/// Element-wise arithmetic mean of equal-length vectors.
fn mean(embeddings: &[Vec<f32>]) -> Vec<f32> {
    let dim = embeddings[0].len();
    let mut out = vec![0.0f64; dim];
    for embedding in embeddings {
        for (acc, &v) in out.iter_mut().zip(embedding) {
            *acc += v as f64;
        }
    }
    let n = embeddings.len() as f64;
    out.into_iter().map(|v| (v / n) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use voicegate_kv::{KvStore, MemoryStore};
    use voicegate_voiceprint::{
        AudioBuffer, ExtractionError, ProfileStoreConfig,
    };
    use crate::recorder::RecordError;

    struct SilentRecorder;

    impl Recorder for SilentRecorder {
        fn record(&self, duration: Duration) -> Result<AudioBuffer, RecordError> {
            let n = (16_000.0 * duration.as_secs_f32()) as usize;
            Ok(AudioBuffer::from_samples(vec![0.0; n]))
        }
    }

    /// Replays a scripted sequence of extraction results.
    struct ScriptedModel {
        script: Mutex<Vec<Result<Vec<f32>, ()>>>,
    }

    impl ScriptedModel {
        fn new(script: Vec<Result<Vec<f32>, ()>>) -> Arc<dyn VoiceprintModel> {
            Arc::new(Self {
                script: Mutex::new(script),
            })
        }
    }

    impl VoiceprintModel for ScriptedModel {
        fn embed(&self, _audio: &AudioBuffer) -> Result<Vec<f32>, ExtractionError> {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Err(ExtractionError::Model("script exhausted".into()));
            }
            script
                .remove(0)
                .map_err(|_| ExtractionError::Model("forced failure".into()))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn prompts(n: usize) -> Vec<String> {
        DEFAULT_PROMPTS.iter().take(n).map(|s| s.to_string()).collect()
    }

    fn store_with(storage: MemoryStore) -> ProfileStore {
        ProfileStore::new(Box::new(storage), ProfileStoreConfig::default()).unwrap()
    }

    #[test]
    fn averages_all_samples() {
        let storage = MemoryStore::new();
        let store = store_with(storage.clone());
        let model = ScriptedModel::new(vec![
            Ok(vec![1.0, 0.0]),
            Ok(vec![0.0, 1.0]),
            Ok(vec![1.0, 1.0]),
        ]);

        let enrolled = run(
            &model,
            &store,
            &SilentRecorder,
            &prompts(3),
            Duration::from_secs(4),
        )
        .unwrap();
        assert!(enrolled);
        assert!(store.trained());

        // Persisted voiceprint is the element-wise mean [2/3, 2/3], not
        // merely something pointing in the [1, 1] direction.
        let raw = storage.get("profile:default").unwrap().unwrap();
        let record: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        let voiceprint: Vec<f32> = record["voiceprint"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap() as f32)
            .collect();
        assert_eq!(voiceprint.len(), 2);
        for (i, &v) in voiceprint.iter().enumerate() {
            assert!(
                (v - 2.0 / 3.0).abs() < 1e-6,
                "component {i} is {v}, want 2/3"
            );
        }
    }

    #[test]
    fn single_failure_is_skipped() {
        let store = store_with(MemoryStore::new());
        let model = ScriptedModel::new(vec![
            Ok(vec![1.0, 0.0]),
            Err(()),
            Ok(vec![0.0, 1.0]),
        ]);

        let enrolled = run(
            &model,
            &store,
            &SilentRecorder,
            &prompts(3),
            Duration::from_secs(4),
        )
        .unwrap();
        assert!(enrolled, "two usable samples are enough");
        assert!(store.trained());
    }

    #[test]
    fn too_few_samples_leaves_profile_unchanged() {
        let storage = MemoryStore::new();
        let store = store_with(storage.clone());
        let model = ScriptedModel::new(vec![Ok(vec![1.0, 0.0]), Err(()), Err(())]);

        let enrolled = run(
            &model,
            &store,
            &SilentRecorder,
            &prompts(3),
            Duration::from_secs(4),
        )
        .unwrap();
        assert!(!enrolled);
        assert!(!store.trained());
        assert!(storage.is_empty(), "no persisted write may occur");
    }

    #[test]
    fn failed_enrollment_preserves_existing_profile() {
        let storage = MemoryStore::new();
        let store = store_with(storage.clone());
        store.save(&[0.5, 0.5]).unwrap();

        let model = ScriptedModel::new(vec![Err(()), Err(()), Ok(vec![1.0, 0.0])]);
        let enrolled = run(
            &model,
            &store,
            &SilentRecorder,
            &prompts(3),
            Duration::from_secs(4),
        )
        .unwrap();
        assert!(!enrolled);

        // Prior reference still verifies.
        let v = store.verify(&[0.5, 0.5]).unwrap();
        assert!(v.accepted);
    }

    #[test]
    fn mismatched_dimension_sample_skipped() {
        let store = store_with(MemoryStore::new());
        let model = ScriptedModel::new(vec![
            Ok(vec![1.0, 0.0]),
            Ok(vec![1.0, 0.0, 0.0]), // wrong dimension, skipped
            Ok(vec![0.0, 1.0]),
        ]);

        let enrolled = run(
            &model,
            &store,
            &SilentRecorder,
            &prompts(3),
            Duration::from_secs(4),
        )
        .unwrap();
        assert!(enrolled);
        assert_eq!(store.dimension(), Some(2));
    }

    #[test]
    fn mean_of_two() {
        let m = mean(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(m, vec![0.5, 0.5]);
    }
}
