//! Response envelope: which of the three reply shapes the endpoint used, and
//! how to turn it into audio bytes.

use base64::Engine;
use bytes::Bytes;
use std::path::PathBuf;
use tracing::debug;

use crate::transport::RawResponse;
use crate::{Error, ErrorContext, Result};

/// The three valid reply shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEnvelope {
    /// JSON `{"file_path": "..."}`: the server wrote the audio to disk.
    FilePath(PathBuf),
    /// JSON `{"audio": "<base64>"}`.
    InlineAudio(String),
    /// Body with `Content-Type: audio/*`.
    Binary(Bytes),
}

/// Where the audio bytes came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    Inline,
    File(PathBuf),
    Body,
}

/// Encoded audio bytes ready for the container decoder.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub bytes: Bytes,
    pub source: AudioSource,
}

impl ResponseEnvelope {
    /// Classify a reply. Anything but status 200 with a JSON or audio body is an error.
    pub fn from_response(response: RawResponse) -> Result<Self> {
        if response.status != 200 {
            let body = String::from_utf8_lossy(&response.body);
            return Err(Error::protocol_with_context(
                Some(response.status),
                format!(
                    "TTS API returned status code {}: {}",
                    response.status, body
                ),
                ErrorContext::new().with_source("response"),
            ));
        }

        let content_type = response.content_type.to_ascii_lowercase();
        if content_type.contains("application/json") {
            Self::from_json(&response.body)
        } else if content_type.contains("audio") {
            debug!(
                content_type = %response.content_type,
                bytes = response.body.len(),
                "binary audio reply"
            );
            Ok(Self::Binary(response.body))
        } else {
            Err(Error::protocol_with_context(
                Some(response.status),
                format!(
                    "unexpected response Content-Type: '{}'",
                    response.content_type
                ),
                ErrorContext::new()
                    .with_field_path("Content-Type")
                    .with_source("response"),
            ))
        }
    }

    fn from_json(body: &[u8]) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
            Error::payload_with_context(
                format!("failed to parse JSON response: {}", e),
                ErrorContext::new().with_source("response"),
            )
        })?;
        let field = |name: &str| {
            json.get(name)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        if let Some(path) = field("file_path") {
            debug!(file_path = %path, "JSON reply references a file");
            return Ok(Self::FilePath(PathBuf::from(path)));
        }
        if let Some(audio) = field("audio") {
            debug!(encoded_len = audio.len(), "JSON reply carries inline audio");
            return Ok(Self::InlineAudio(audio));
        }
        Err(Error::payload_with_context(
            "no audio data in response",
            ErrorContext::new()
                .with_details("expected a non-empty 'file_path' or 'audio' field")
                .with_source("response"),
        ))
    }

    /// Whether this shape is the one requested with `return_audio`.
    pub fn matches_return_audio(&self, return_audio: bool) -> bool {
        match self {
            Self::FilePath(_) => !return_audio,
            Self::InlineAudio(_) | Self::Binary(_) => return_audio,
        }
    }

    /// Resolve to encoded audio bytes. A referenced file is read in full and closed here.
    pub fn into_payload(self) -> Result<AudioPayload> {
        let payload = match self {
            Self::FilePath(path) => {
                let bytes = std::fs::read(&path).map_err(|e| {
                    Error::payload_with_context(
                        format!("failed to read audio file: {}", e),
                        ErrorContext::new()
                            .with_field_path("file_path")
                            .with_details(path.display().to_string()),
                    )
                })?;
                AudioPayload {
                    bytes: Bytes::from(bytes),
                    source: AudioSource::File(path),
                }
            }
            Self::InlineAudio(encoded) => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(encoded.trim())
                    .map_err(|e| {
                        Error::payload_with_context(
                            format!("invalid base64 audio: {}", e),
                            ErrorContext::new().with_field_path("audio"),
                        )
                    })?;
                AudioPayload {
                    bytes: Bytes::from(bytes),
                    source: AudioSource::Inline,
                }
            }
            Self::Binary(bytes) => AudioPayload {
                bytes,
                source: AudioSource::Body,
            },
        };

        if payload.bytes.is_empty() {
            return Err(Error::payload_with_context(
                "audio payload is empty",
                ErrorContext::new().with_details(format!("{:?}", payload.source)),
            ));
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, content_type: &str, body: &[u8]) -> RawResponse {
        RawResponse {
            status,
            content_type: content_type.to_string(),
            body: Bytes::copy_from_slice(body),
        }
    }

    #[test]
    fn test_non_200_is_protocol_error_with_body() {
        let err = ResponseEnvelope::from_response(reply(500, "text/plain", b"server error"))
            .unwrap_err();
        assert!(err.is_protocol());
        assert_eq!(err.status(), Some(500));
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("server error"));
    }

    #[test]
    fn test_other_2xx_is_still_rejected() {
        let err = ResponseEnvelope::from_response(reply(204, "audio/mpeg", b"")).unwrap_err();
        assert_eq!(err.status(), Some(204));
    }

    #[test]
    fn test_unexpected_content_type_is_named() {
        let err =
            ResponseEnvelope::from_response(reply(200, "text/plain; charset=utf-8", b"hello"))
                .unwrap_err();
        assert!(err.is_protocol());
        assert!(err.to_string().contains("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_missing_content_type_is_protocol_error() {
        let err = ResponseEnvelope::from_response(reply(200, "", b"\x00\x01")).unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_audio_content_type_is_binary() {
        let env = ResponseEnvelope::from_response(reply(200, "Audio/MPEG", b"ID3")).unwrap();
        assert_eq!(env, ResponseEnvelope::Binary(Bytes::from_static(b"ID3")));
    }

    #[test]
    fn test_file_path_wins_over_inline_audio() {
        let env = ResponseEnvelope::from_response(reply(
            200,
            "application/json",
            br#"{"audio": "AAAA", "file_path": "/tmp/out.wav"}"#,
        ))
        .unwrap();
        assert_eq!(env, ResponseEnvelope::FilePath(PathBuf::from("/tmp/out.wav")));
        assert!(env.matches_return_audio(false));
    }

    #[test]
    fn test_empty_fields_count_as_missing() {
        let env = ResponseEnvelope::from_response(reply(
            200,
            "application/json; charset=utf-8",
            br#"{"audio": "AAAA", "file_path": ""}"#,
        ))
        .unwrap();
        assert_eq!(env, ResponseEnvelope::InlineAudio("AAAA".into()));

        let err = ResponseEnvelope::from_response(reply(
            200,
            "application/json",
            br#"{"audio": "", "file_path": null}"#,
        ))
        .unwrap_err();
        assert!(err.is_payload());
        assert!(err.to_string().contains("no audio data in response"));
    }

    #[test]
    fn test_invalid_json_is_payload_error() {
        let err = ResponseEnvelope::from_response(reply(200, "application/json", b"{not json"))
            .unwrap_err();
        assert!(err.is_payload());
    }

    #[test]
    fn test_inline_payload_is_base64_decoded() {
        let payload = ResponseEnvelope::InlineAudio("UklGRg==".into())
            .into_payload()
            .unwrap();
        assert_eq!(&payload.bytes[..], b"RIFF");
        assert_eq!(payload.source, AudioSource::Inline);

        let err = ResponseEnvelope::InlineAudio("***".into())
            .into_payload()
            .unwrap_err();
        assert!(err.is_payload());
    }

    #[test]
    fn test_file_payload_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        std::fs::write(&path, b"RIFF....").unwrap();

        let payload = ResponseEnvelope::FilePath(path.clone()).into_payload().unwrap();
        assert_eq!(&payload.bytes[..], b"RIFF....");
        assert_eq!(payload.source, AudioSource::File(path));

        let err = ResponseEnvelope::FilePath(dir.path().join("gone.wav"))
            .into_payload()
            .unwrap_err();
        assert!(err.is_payload());
        assert!(err.to_string().contains("gone.wav"));
    }

    #[test]
    fn test_empty_body_is_payload_error() {
        let err = ResponseEnvelope::Binary(Bytes::new()).into_payload().unwrap_err();
        assert!(err.is_payload());
    }
}
