//! Mock speech endpoint and in-memory audio fixtures shared by the integration tests.

#![allow(dead_code)]

use mockito::{Mock, Server, ServerGuard};
use std::io::Cursor;

pub const SPEECH_PATH: &str = "/v1/audio/speech";

/// Test fixture that owns a mock server
pub struct MockSpeechServer {
    pub server: ServerGuard,
}

impl MockSpeechServer {
    pub fn new() -> Self {
        Self {
            server: Server::new(),
        }
    }

    /// Endpoint URL to put into the node configuration
    pub fn speech_url(&self) -> String {
        format!("{}{}", self.server.url(), SPEECH_PATH)
    }

    /// Create a mock for a raw binary audio reply
    pub fn mock_audio_response(&mut self, content_type: &str, body: &[u8]) -> Mock {
        self.server
            .mock("POST", SPEECH_PATH)
            .with_status(200)
            .with_header("content-type", content_type)
            .with_body(body)
            .create()
    }

    /// Create a mock for a JSON reply
    pub fn mock_json_response(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", SPEECH_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create()
    }

    /// Create a mock for an error reply
    pub fn mock_error_response(&mut self, status: usize, content_type: &str, body: &str) -> Mock {
        self.server
            .mock("POST", SPEECH_PATH)
            .with_status(status)
            .with_header("content-type", content_type)
            .with_body(body)
            .create()
    }
}

/// In-memory 16-bit integer WAV.
pub fn wav_i16(channels: u16, sample_rate: u32, interleaved: &[i16]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for s in interleaved {
            writer.write_sample(*s).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// A short stereo tone-like pattern, interleaved L/R.
pub fn stereo_pattern(frames: usize) -> Vec<i16> {
    (0..frames)
        .flat_map(|i| {
            let v = ((i % 64) as i16 - 32) * 512;
            [v, -v]
        })
        .collect()
}

/// Stereo MPEG-1 Layer III stream, 44.1 kHz, 128 kbit/s, 40 frames.
///
/// Every granule carries a count1 region (table B) with non-zero
/// coefficients; the two channels use different global gains.
pub const TONE_STEREO_MP3: &[u8] = include_bytes!("../fixtures/tone_stereo.mp3");
pub const TONE_STEREO_SAMPLE_RATE: u32 = 44_100;
