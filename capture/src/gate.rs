//! Speaker verification gate.

use std::sync::Arc;

use tracing::warn;
use voicegate_voiceprint::{AudioBuffer, ProfileStore, Verification, VoiceprintModel};

/// Decides whether a captured buffer belongs to the enrolled speaker.
///
/// # Fail-open / fail-closed policy
///
/// With no extractor configured or no profile trained, the gate is open:
/// every buffer passes with score 1.0. The system stays usable before
/// enrollment at the cost of zero protection until the user trains it.
/// This default is deliberate product behavior; changing it to fail-closed
/// changes what the system is, not just its structure.
///
/// Once a profile is trained and an extractor is present, any extraction
/// or scoring failure fails closed: the buffer is rejected with score 0.0.
pub struct VerificationGate {
    model: Option<Arc<dyn VoiceprintModel>>,
    store: Arc<ProfileStore>,
}

impl VerificationGate {
    /// Creates a gate. `model: None` leaves the gate permanently open.
    pub fn new(model: Option<Arc<dyn VoiceprintModel>>, store: Arc<ProfileStore>) -> Self {
        Self { model, store }
    }

    /// Scores the buffer against the enrolled profile.
    pub fn verify_speaker(&self, audio: &AudioBuffer) -> Verification {
        const OPEN: Verification = Verification {
            accepted: true,
            score: 1.0,
        };
        const CLOSED: Verification = Verification {
            accepted: false,
            score: 0.0,
        };

        let Some(model) = &self.model else {
            return OPEN;
        };
        if !self.store.trained() {
            return OPEN;
        }

        let candidate = match model.embed(audio) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!(error = %e, "embedding extraction failed, rejecting speaker");
                return CLOSED;
            }
        };

        match self.store.verify(&candidate) {
            Ok(verification) => verification,
            Err(e) => {
                warn!(error = %e, "profile verification failed, rejecting speaker");
                CLOSED
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicegate_kv::MemoryStore;
    use voicegate_voiceprint::{ExtractionError, ProfileStoreConfig};

    /// Stub extractor returning a fixed embedding or a forced failure.
    struct StubModel {
        embedding: Option<Vec<f32>>,
    }

    impl VoiceprintModel for StubModel {
        fn embed(&self, _audio: &AudioBuffer) -> Result<Vec<f32>, ExtractionError> {
            self.embedding
                .clone()
                .ok_or_else(|| ExtractionError::Model("forced failure".into()))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn profile_store() -> Arc<ProfileStore> {
        Arc::new(
            ProfileStore::new(
                Box::new(MemoryStore::new()),
                ProfileStoreConfig::default(),
            )
            .unwrap(),
        )
    }

    fn any_buffer() -> AudioBuffer {
        AudioBuffer::from_samples(vec![0.1; 16_000])
    }

    #[test]
    fn untrained_profile_fails_open() {
        let store = profile_store();
        let gate = VerificationGate::new(
            Some(Arc::new(StubModel {
                embedding: Some(vec![1.0, 0.0]),
            })),
            store,
        );

        let v = gate.verify_speaker(&any_buffer());
        assert!(v.accepted);
        assert_eq!(v.score, 1.0);
    }

    #[test]
    fn missing_model_fails_open() {
        let store = profile_store();
        store.save(&[1.0, 0.0]).unwrap();
        let gate = VerificationGate::new(None, store);

        let v = gate.verify_speaker(&any_buffer());
        assert!(v.accepted);
        assert_eq!(v.score, 1.0);
    }

    #[test]
    fn extraction_failure_fails_closed() {
        let store = profile_store();
        store.save(&[1.0, 0.0]).unwrap();
        let gate = VerificationGate::new(
            Some(Arc::new(StubModel { embedding: None })),
            store,
        );

        let v = gate.verify_speaker(&any_buffer());
        assert!(!v.accepted);
        assert_eq!(v.score, 0.0);
    }

    #[test]
    fn matching_speaker_accepted_with_store_score() {
        let store = profile_store();
        store.save(&[1.0, 0.0]).unwrap();
        let gate = VerificationGate::new(
            Some(Arc::new(StubModel {
                embedding: Some(vec![1.0, 0.0]),
            })),
            store,
        );

        let v = gate.verify_speaker(&any_buffer());
        assert!(v.accepted);
        assert!((v.score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_speaker_rejected_with_score() {
        let store = profile_store();
        store.save(&[1.0, 0.0]).unwrap();
        let gate = VerificationGate::new(
            Some(Arc::new(StubModel {
                embedding: Some(vec![0.0, 1.0]),
            })),
            store,
        );

        let v = gate.verify_speaker(&any_buffer());
        assert!(!v.accepted);
        assert!(v.score < 0.75);
    }

    #[test]
    fn dimension_mismatch_fails_closed() {
        let store = profile_store();
        store.save(&[1.0, 0.0, 0.0]).unwrap();
        let gate = VerificationGate::new(
            Some(Arc::new(StubModel {
                embedding: Some(vec![1.0, 0.0]),
            })),
            store,
        );

        let v = gate.verify_speaker(&any_buffer());
        assert!(!v.accepted);
        assert_eq!(v.score, 0.0);
    }

    #[test]
    fn reset_reopens_the_gate() {
        let store = profile_store();
        store.save(&[1.0, 0.0]).unwrap();
        let gate = VerificationGate::new(
            Some(Arc::new(StubModel {
                embedding: Some(vec![0.0, 1.0]),
            })),
            Arc::clone(&store),
        );

        assert!(!gate.verify_speaker(&any_buffer()).accepted);

        store.reset().unwrap();
        let v = gate.verify_speaker(&any_buffer());
        assert!(v.accepted);
        assert_eq!(v.score, 1.0);
    }
}
