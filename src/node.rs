//! The TTS node: one request, one reply, one waveform.

use ndarray::{Array3, Axis};
use std::time::Duration;
use tracing::{info, warn};

use crate::audio::{self, waveform};
use crate::config::{AudioFormat, TtsNodeConfig};
use crate::response::{AudioPayload, ResponseEnvelope};
use crate::transport::{AsyncHttpTransport, HttpTransport, RawResponse, SpeechRequest};
use crate::Result;

/// Decoded speech in the host's AUDIO layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    /// Shape `(1, channels, samples)`, values in [-1, 1].
    pub waveform: Array3<f32>,
    /// Taken from the decoded container.
    pub sample_rate: u32,
}

impl SynthesizedAudio {
    pub fn channels(&self) -> usize {
        self.waveform.len_of(Axis(1))
    }

    /// Samples per channel.
    pub fn num_samples(&self) -> usize {
        self.waveform.len_of(Axis(2))
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.num_samples() as f64 / self.sample_rate as f64)
    }

    pub fn into_parts(self) -> (Array3<f32>, u32) {
        (self.waveform, self.sample_rate)
    }
}

/// Decode an audio payload declared as `format` into a waveform tensor.
pub fn decode_payload(payload: &AudioPayload, format: AudioFormat) -> Result<SynthesizedAudio> {
    let pcm = audio::decode(&payload.bytes, format)?;
    let waveform = waveform::to_waveform(&pcm)?;
    Ok(SynthesizedAudio {
        waveform,
        sample_rate: pcm.sample_rate,
    })
}

fn resolve_reply(config: &TtsNodeConfig, response: RawResponse) -> Result<AudioPayload> {
    let envelope = ResponseEnvelope::from_response(response)?;
    if !envelope.matches_return_audio(config.return_audio) {
        warn!(
            return_audio = config.return_audio,
            "reply shape differs from the requested return_audio mode"
        );
    }
    envelope.into_payload()
}

fn log_start(config: &TtsNodeConfig) {
    info!(
        url = %config.url,
        model = %config.model,
        voice = %config.voice,
        format = %config.response_format,
        return_audio = config.return_audio,
        chars = config.text.chars().count(),
        "requesting speech"
    );
}

fn log_done(audio: &SynthesizedAudio) {
    info!(
        channels = audio.channels(),
        samples = audio.num_samples(),
        sample_rate = audio.sample_rate,
        "speech decoded"
    );
}

/// Blocking node. Each call is a single atomic attempt.
pub struct TtsNode {
    transport: HttpTransport,
}

impl TtsNode {
    pub fn new() -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new()?,
        })
    }

    pub fn with_transport(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Send the request and return the encoded audio bytes without decoding.
    pub fn fetch_audio(&self, config: &TtsNodeConfig) -> Result<AudioPayload> {
        let url = config.validate()?;
        log_start(config);
        let response = self.transport.post_speech(
            &url,
            &SpeechRequest::from_config(config),
            config.bearer_token(),
        )?;
        resolve_reply(config, response)
    }

    /// Synthesize `config.text` and decode it to `(1, channels, samples)`.
    pub fn synthesize(&self, config: &TtsNodeConfig) -> Result<SynthesizedAudio> {
        let payload = self.fetch_audio(config)?;
        let audio = decode_payload(&payload, config.response_format)?;
        log_done(&audio);
        Ok(audio)
    }
}

/// Same pipeline on a tokio runtime.
pub struct AsyncTtsNode {
    transport: AsyncHttpTransport,
}

impl AsyncTtsNode {
    pub fn new() -> Result<Self> {
        Ok(Self {
            transport: AsyncHttpTransport::new()?,
        })
    }

    pub fn with_transport(transport: AsyncHttpTransport) -> Self {
        Self { transport }
    }

    pub async fn fetch_audio(&self, config: &TtsNodeConfig) -> Result<AudioPayload> {
        let url = config.validate()?;
        log_start(config);
        let response = self
            .transport
            .post_speech(
                &url,
                &SpeechRequest::from_config(config),
                config.bearer_token(),
            )
            .await?;
        resolve_reply(config, response)
    }

    pub async fn synthesize(&self, config: &TtsNodeConfig) -> Result<SynthesizedAudio> {
        let payload = self.fetch_audio(config).await?;
        let audio = decode_payload(&payload, config.response_format)?;
        log_done(&audio);
        Ok(audio)
    }
}

/// One-shot blocking synthesis with a fresh client.
pub fn synthesize(config: &TtsNodeConfig) -> Result<SynthesizedAudio> {
    TtsNode::new()?.synthesize(config)
}
