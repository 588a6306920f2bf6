//! File-backed audio sources for the CLI.
//!
//! The pipeline consumes 16kHz mono audio through the [`Recorder`] trait.
//! These sources feed it from PCM files instead of a live device: one file
//! per capture window, either queued up front or streamed as paths on stdin.

use std::collections::VecDeque;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;
use voicegate_capture::{RecordError, Recorder};
use voicegate_voiceprint::AudioBuffer;

/// Loads an audio file as a capture buffer.
///
/// Accepts raw signed 16-bit little-endian PCM, or a canonical 44-byte
/// header WAV of the same encoding. Either way the content must be 16kHz
/// mono; the file carries no way to check, so the caller guarantees it.
pub fn read_audio(path: &Path) -> Result<AudioBuffer, RecordError> {
    let bytes = std::fs::read(path)
        .map_err(|e| RecordError::Device(format!("{}: {e}", path.display())))?;
    let pcm = if bytes.len() > 44 && &bytes[0..4] == b"RIFF" {
        &bytes[44..]
    } else {
        &bytes[..]
    };
    debug!(path = %path.display(), bytes = pcm.len(), "loaded audio file");
    Ok(decode_pcm16(pcm))
}

fn decode_pcm16(bytes: &[u8]) -> AudioBuffer {
    let samples = bytes
        .chunks_exact(2)
        .map(|b| f32::from(i16::from_le_bytes([b[0], b[1]])) / f32::from(i16::MAX))
        .collect();
    AudioBuffer::from_samples(samples)
}

/// [`Recorder`] that replays a fixed queue of files, one per record call.
/// An exhausted queue reports [`RecordError::Closed`].
pub struct FileSource {
    queue: Mutex<VecDeque<PathBuf>>,
}

impl FileSource {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            queue: Mutex::new(paths.into_iter().collect()),
        }
    }
}

impl Recorder for FileSource {
    fn record(&self, _duration: Duration) -> Result<AudioBuffer, RecordError> {
        let path = self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(RecordError::Closed)?;
        read_audio(&path)
    }
}

/// [`Recorder`] that reads one file path per line from stdin and replays
/// that file as the capture window. End of input sets the shared cancel
/// flag so a continuous session stops at the next cycle boundary.
pub struct StdinSource {
    cancel: Arc<AtomicBool>,
}

impl StdinSource {
    pub fn new(cancel: Arc<AtomicBool>) -> Self {
        Self { cancel }
    }
}

impl Recorder for StdinSource {
    fn record(&self, _duration: Duration) -> Result<AudioBuffer, RecordError> {
        let mut line = String::new();
        let n = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| RecordError::Device(e.to_string()))?;
        if n == 0 {
            self.cancel.store(true, Ordering::SeqCst);
            return Err(RecordError::Closed);
        }
        let path = line.trim();
        if path.is_empty() {
            return Err(RecordError::Device("empty input line".into()));
        }
        read_audio(Path::new(path))
    }
}
