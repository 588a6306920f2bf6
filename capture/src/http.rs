//! HTTP transcription backend.

use serde::Deserialize;
use tracing::debug;
use voicegate_voiceprint::{AudioBuffer, SAMPLE_RATE};

use crate::transcriber::{RecognitionError, Transcriber};

/// Transcribes audio by POSTing a mono 16-bit WAV to an HTTP endpoint
/// that answers `{"text": "..."}`. An empty or missing `text` field maps
/// to `Ok(None)`: the service worked but understood no words.
pub struct HttpTranscriber {
    url: String,
}

#[derive(Deserialize)]
struct TranscribeResponse {
    text: Option<String>,
}

impl HttpTranscriber {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        Self { url }
    }
}

impl Transcriber for HttpTranscriber {
    fn transcribe(&self, audio: &AudioBuffer) -> Result<Option<String>, RecognitionError> {
        let wav = encode_wav(audio.samples());

        let mut response = ureq::post(&self.url)
            .header("Content-Type", "audio/wav")
            .send(&wav[..])
            .map_err(|e| RecognitionError::Service(e.to_string()))?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| RecognitionError::Service(e.to_string()))?;
        debug!(bytes = body.len(), "transcription response received");

        decode_response(&body)
    }
}

fn decode_response(body: &str) -> Result<Option<String>, RecognitionError> {
    let parsed: TranscribeResponse = serde_json::from_str(body)
        .map_err(|e| RecognitionError::InvalidResponse(e.to_string()))?;
    Ok(parsed
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty()))
}

/// Encodes f32 samples in [-1, 1] as a mono 16kHz 16-bit PCM WAV.
fn encode_wav(samples: &[f32]) -> Vec<u8> {
    const BITS_PER_SAMPLE: u16 = 16;
    const CHANNELS: u16 = 1;
    let data_len = (samples.len() * 2) as u32;
    let byte_rate = SAMPLE_RATE * u32::from(CHANNELS) * u32::from(BITS_PER_SAMPLE) / 8;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;

    let mut out = Vec::with_capacity(44 + samples.len() * 2);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_with_text() {
        let text = decode_response(r#"{"text": "turn on the lights"}"#).unwrap();
        assert_eq!(text, Some("turn on the lights".to_string()));
    }

    #[test]
    fn response_text_is_trimmed() {
        let text = decode_response(r#"{"text": "  hello  "}"#).unwrap();
        assert_eq!(text, Some("hello".to_string()));
    }

    #[test]
    fn empty_and_missing_text_mean_no_words() {
        assert_eq!(decode_response(r#"{"text": ""}"#).unwrap(), None);
        assert_eq!(decode_response(r#"{"text": "   "}"#).unwrap(), None);
        assert_eq!(decode_response(r#"{"text": null}"#).unwrap(), None);
        assert_eq!(decode_response("{}").unwrap(), None);
    }

    #[test]
    fn malformed_body_is_invalid_response() {
        assert!(matches!(
            decode_response("not json"),
            Err(RecognitionError::InvalidResponse(_))
        ));
    }

    #[test]
    fn wav_header_layout() {
        let wav = encode_wav(&[0.0, 0.5, -0.5]);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(wav.len(), 44 + 6);
        // data chunk length covers the three 16-bit samples
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 6);
    }

    #[test]
    fn wav_samples_clamped_and_scaled() {
        let wav = encode_wav(&[1.5, -1.5]);
        let first = i16::from_le_bytes([wav[44], wav[45]]);
        let second = i16::from_le_bytes([wav[46], wav[47]]);
        assert_eq!(first, i16::MAX);
        assert_eq!(second, -i16::MAX);
    }
}
