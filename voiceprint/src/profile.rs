//! Voice profile ownership, persistence and similarity verification.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voicegate_kv::KvStore;

use crate::cosine::cosine_similarity;
use crate::error::ProfileError;

/// Default acceptance threshold for cosine scores.
pub const DEFAULT_THRESHOLD: f32 = 0.75;

/// Default profile identifier for the single-user case.
pub const DEFAULT_PROFILE_ID: &str = "default";

/// Outcome of one verification call. Ephemeral, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    /// True when the score met the acceptance threshold.
    pub accepted: bool,
    /// Similarity score in [0, 1].
    pub score: f32,
}

/// Persisted profile record. One record per profile key.
#[derive(Debug, Serialize, Deserialize)]
struct ProfileRecord {
    dim: usize,
    threshold: f32,
    created_at: DateTime<Utc>,
    voiceprint: Vec<f32>,
}

/// Configuration for [`ProfileStore`], fixed at construction.
///
/// The threshold is deliberately not adjustable per call: this is a
/// single-profile, single-threshold speaker lock.
#[derive(Debug, Clone)]
pub struct ProfileStoreConfig {
    /// Opaque profile identifier. The single-user deployment uses
    /// [`DEFAULT_PROFILE_ID`]; multi-user variants key additional profiles.
    pub profile_id: String,
    /// Acceptance threshold in (0, 1).
    pub threshold: f32,
}

impl Default for ProfileStoreConfig {
    fn default() -> Self {
        Self {
            profile_id: DEFAULT_PROFILE_ID.to_string(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Owns the enrolled voiceprint and answers similarity queries.
///
/// The store is the only component that mutates the profile. `save`
/// persists the record before swapping the in-memory reference under a
/// write lock, so concurrent `verify` readers observe either the old or
/// the new voiceprint, never a partial one.
pub struct ProfileStore {
    storage: Box<dyn KvStore>,
    key: String,
    threshold: f32,
    reference: RwLock<Option<Vec<f32>>>,
}

impl ProfileStore {
    /// Creates a store over `storage`. Fails when the configured threshold
    /// lies outside (0, 1). Does not touch storage; call [`ProfileStore::load`]
    /// to pick up a previously persisted profile.
    pub fn new(
        storage: Box<dyn KvStore>,
        cfg: ProfileStoreConfig,
    ) -> Result<Self, ProfileError> {
        if !(cfg.threshold > 0.0 && cfg.threshold < 1.0) {
            return Err(ProfileError::InvalidThreshold(cfg.threshold));
        }
        Ok(Self {
            storage,
            key: format!("profile:{}", cfg.profile_id),
            threshold: cfg.threshold,
            reference: RwLock::new(None),
        })
    }

    /// Loads a persisted voiceprint if one exists.
    ///
    /// Returns `Ok(true)` and marks the profile trained on success,
    /// `Ok(false)` when nothing is persisted. Absence is a normal state,
    /// not an error; only storage failures and corrupt records error.
    pub fn load(&self) -> Result<bool, ProfileError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(false);
        };

        let record: ProfileRecord = serde_json::from_slice(&raw)
            .map_err(|e| ProfileError::Serialization(e.to_string()))?;
        if record.voiceprint.is_empty() || record.voiceprint.len() != record.dim {
            return Err(ProfileError::Serialization(format!(
                "record dim {} does not match voiceprint length {}",
                record.dim,
                record.voiceprint.len()
            )));
        }

        let mut reference = self.reference.write().unwrap();
        *reference = Some(record.voiceprint);
        Ok(true)
    }

    /// Replaces the stored voiceprint unconditionally and marks the profile
    /// trained. The record is durably written before the in-memory swap.
    pub fn save(&self, voiceprint: &[f32]) -> Result<(), ProfileError> {
        if voiceprint.is_empty() {
            return Err(ProfileError::EmptyVoiceprint);
        }

        let record = ProfileRecord {
            dim: voiceprint.len(),
            threshold: self.threshold,
            created_at: Utc::now(),
            voiceprint: voiceprint.to_vec(),
        };
        let raw = serde_json::to_vec(&record)
            .map_err(|e| ProfileError::Serialization(e.to_string()))?;
        self.storage.set(&self.key, &raw)?;

        let mut reference = self.reference.write().unwrap();
        *reference = Some(voiceprint.to_vec());
        Ok(())
    }

    /// Scores a candidate embedding against the enrolled reference.
    ///
    /// Deterministic and side-effect free. The score is the cosine
    /// similarity floored at 0.0, so degenerate candidates score as no
    /// match rather than as negative values.
    pub fn verify(&self, candidate: &[f32]) -> Result<Verification, ProfileError> {
        let reference = self.reference.read().unwrap();
        let Some(reference) = reference.as_ref() else {
            return Err(ProfileError::Untrained);
        };
        if candidate.len() != reference.len() {
            return Err(ProfileError::DimensionMismatch {
                expected: reference.len(),
                got: candidate.len(),
            });
        }

        let score = cosine_similarity(reference, candidate).max(0.0);
        Ok(Verification {
            accepted: score >= self.threshold,
            score,
        })
    }

    /// Clears the profile back to the untrained state and deletes the
    /// persisted record.
    pub fn reset(&self) -> Result<(), ProfileError> {
        self.storage.delete(&self.key)?;
        let mut reference = self.reference.write().unwrap();
        *reference = None;
        Ok(())
    }

    /// Returns true when a reference voiceprint is enrolled.
    pub fn trained(&self) -> bool {
        self.reference.read().unwrap().is_some()
    }

    /// Returns the acceptance threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Returns the enrolled voiceprint dimension, if trained.
    pub fn dimension(&self) -> Option<usize> {
        self.reference.read().unwrap().as_ref().map(|v| v.len())
    }
}
