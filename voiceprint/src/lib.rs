//! Speaker voiceprints: extraction, profile storage and verification.
//!
//! # Architecture
//!
//! The verification pipeline runs in three stages:
//!
//! 1. [`VoiceprintModel::embed`]: 16kHz mono f32 audio -> embedding vector
//! 2. [`cosine_similarity`]: candidate embedding vs. enrolled reference
//! 3. [`ProfileStore::verify`]: threshold decision -> [`Verification`]
//!
//! The enrolled reference is the element-wise mean of at least two sample
//! embeddings, produced by the enrollment flow and committed through
//! [`ProfileStore::save`]. The store persists exactly one record per
//! profile key through the `voicegate-kv` storage trait.
//!
//! # Feature Extraction
//!
//! The [`fbank`] module provides log mel filterbank extraction:
//! - Hamming window, 25ms frames, 10ms shift
//! - Pre-emphasis 0.97
//! - Cooley-Tukey FFT
//! - Mel triangular filterbank
//!
//! [`SpectralModel`] pools those features into a fixed-length embedding so
//! the pipeline works without an external inference engine; neural
//! extractors plug in behind the same [`VoiceprintModel`] trait.

mod audio;
mod cosine;
mod error;
pub mod fbank;
mod model;
mod profile;
mod spectral;

pub use audio::{AudioBuffer, SAMPLE_RATE};
pub use cosine::cosine_similarity;
pub use error::{ExtractionError, ProfileError};
pub use fbank::{compute_fbank, l2_normalize, FbankConfig};
pub use model::VoiceprintModel;
pub use profile::{
    ProfileStore, ProfileStoreConfig, Verification, DEFAULT_PROFILE_ID, DEFAULT_THRESHOLD,
};
pub use spectral::SpectralModel;
