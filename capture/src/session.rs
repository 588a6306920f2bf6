//! Capture session controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use voicegate_vad::SpeechDetector;
use voicegate_voiceprint::{
    AudioBuffer, ProfileError, ProfileStore, Verification, VoiceprintModel,
};

use crate::enroll::{self, DEFAULT_PROMPTS};
use crate::error::CaptureError;
use crate::gate::VerificationGate;
use crate::recorder::Recorder;
use crate::transcriber::Transcriber;

/// Terminal outcome of one capture cycle. The three variants stay
/// distinguishable so a driving UI can tell "no speech" from "wrong
/// speaker" from "understood nothing".
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// The buffer contained no speech; the verification gate never ran.
    Silent,
    /// Speech was present but the speaker was rejected; transcription
    /// never ran.
    Rejected { score: f32 },
    /// The speaker was accepted. `text: None` means the transcriber
    /// understood no words or the service failed (logged, non-fatal).
    Report { text: Option<String> },
}

/// Configuration for a [`CaptureSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Recording window per listen cycle in seconds (default: 4.0).
    pub listen_secs: f32,
    /// Recording window per enrollment sample in seconds (default: 4.0).
    pub enroll_secs: f32,
    /// Delay between cycles in continuous mode (default: 500ms).
    pub cycle_delay: Duration,
    /// Enrollment prompts, one recording round each (default: 3 prompts).
    pub prompts: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            listen_secs: 4.0,
            enroll_secs: 4.0,
            cycle_delay: Duration::from_millis(500),
            prompts: DEFAULT_PROMPTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Drives capture cycles through the gating pipeline:
///
/// ```text
/// IDLE -> RECORDING -> SPEECH_CHECK -> SPEAKER_CHECK -> RECOGNIZE
///                           |                |              |
///                         SILENT          REJECTED      REPORT
/// ```
///
/// One cycle runs to completion before the next begins; recording blocks
/// for the fixed window. Cancellation of continuous mode is observed only
/// between cycles, leaving the profile store and any in-flight buffer
/// consistent.
pub struct CaptureSession {
    recorder: Box<dyn Recorder>,
    detector: Box<dyn SpeechDetector>,
    model: Option<Arc<dyn VoiceprintModel>>,
    transcriber: Box<dyn Transcriber>,
    store: Arc<ProfileStore>,
    gate: VerificationGate,
    cfg: SessionConfig,
}

impl CaptureSession {
    /// Wires a session. `model: None` runs the pipeline without a speaker
    /// lock: the gate fails open and enrollment refuses to run.
    pub fn new(
        recorder: Box<dyn Recorder>,
        detector: Box<dyn SpeechDetector>,
        model: Option<Arc<dyn VoiceprintModel>>,
        transcriber: Box<dyn Transcriber>,
        store: Arc<ProfileStore>,
        cfg: SessionConfig,
    ) -> Self {
        let gate = VerificationGate::new(model.clone(), Arc::clone(&store));
        Self {
            recorder,
            detector,
            model,
            transcriber,
            store,
            gate,
            cfg,
        }
    }

    /// Returns true when a voice profile is enrolled.
    pub fn trained(&self) -> bool {
        self.store.trained()
    }

    /// Runs the enrollment flow over the configured prompts.
    /// Returns `Ok(true)` when a new profile was committed.
    pub fn enroll(&self) -> Result<bool, CaptureError> {
        let Some(model) = &self.model else {
            return Err(CaptureError::ModelUnavailable);
        };
        enroll::run(
            model,
            &self.store,
            self.recorder.as_ref(),
            &self.cfg.prompts,
            Duration::from_secs_f32(self.cfg.enroll_secs),
        )
    }

    /// Scores an already-captured buffer against the enrolled profile.
    pub fn verify_speaker(&self, audio: &AudioBuffer) -> Verification {
        self.gate.verify_speaker(audio)
    }

    /// Runs one capture cycle: record, speech check, speaker check,
    /// transcribe.
    pub fn listen_once(&self) -> Result<CaptureOutcome, CaptureError> {
        let audio = self
            .recorder
            .record(Duration::from_secs_f32(self.cfg.listen_secs))?;
        debug!(samples = audio.len(), "recorded capture window");

        if !self.detector.has_speech(&audio) {
            info!("no speech detected");
            return Ok(CaptureOutcome::Silent);
        }

        let verification = self.gate.verify_speaker(&audio);
        if !verification.accepted {
            info!(score = verification.score, "speaker rejected");
            return Ok(CaptureOutcome::Rejected {
                score: verification.score,
            });
        }
        if self.store.trained() {
            debug!(score = verification.score, "speaker verified");
        }

        let text = match self.transcriber.transcribe(&audio) {
            Ok(Some(text)) => {
                info!(%text, "transcription complete");
                Some(text)
            }
            Ok(None) => {
                info!("transcriber understood no words");
                None
            }
            Err(e) => {
                // Service failures end the cycle with a no-text report.
                warn!(error = %e, "transcription service failed");
                None
            }
        };
        Ok(CaptureOutcome::Report { text })
    }

    /// Repeats capture cycles until `cancel` is set.
    ///
    /// Cancellation is checked between cycles only, never mid-cycle. A
    /// failed cycle (e.g. recorder error) is logged and the loop moves on;
    /// no retry of the failed buffer is attempted.
    pub fn run_continuous(
        &self,
        cancel: &AtomicBool,
        mut on_outcome: impl FnMut(CaptureOutcome),
    ) {
        while !cancel.load(Ordering::SeqCst) {
            match self.listen_once() {
                Ok(outcome) => on_outcome(outcome),
                Err(e) => warn!(error = %e, "capture cycle failed"),
            }
            if cancel.load(Ordering::SeqCst) {
                break;
            }
            std::thread::sleep(self.cfg.cycle_delay);
        }
        info!("continuous capture stopped");
    }

    /// Clears the enrolled profile and its persisted record.
    pub fn reset_profile(&self) -> Result<(), ProfileError> {
        self.store.reset()
    }
}
