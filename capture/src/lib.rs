//! Voice-gated command capture.
//!
//! Sequences one capture cycle as
//!
//! ```text
//! record -> speech check -> speaker check -> transcribe
//! ```
//!
//! and only hands audio to transcription when the speech check passes and
//! the verification gate accepts the speaker. The three rejection paths
//! stay distinguishable for callers: [`CaptureOutcome::Silent`] (no
//! speech), [`CaptureOutcome::Rejected`] (wrong speaker) and
//! [`CaptureOutcome::Report`] with no text (understood nothing).
//!
//! Collaborators (microphone, embedding extractor, transcription backend,
//! profile persistence) sit behind narrow traits; the pipeline itself is
//! synchronous and runs one cycle to completion before the next begins.

mod enroll;
mod error;
mod gate;
mod http;
mod recorder;
mod session;
mod transcriber;

pub use enroll::DEFAULT_PROMPTS;
pub use error::CaptureError;
pub use gate::VerificationGate;
pub use http::HttpTranscriber;
pub use recorder::{RecordError, Recorder};
pub use session::{CaptureOutcome, CaptureSession, SessionConfig};
pub use transcriber::{RecognitionError, Transcriber};
