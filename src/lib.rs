//! # openai-tts-node
//!
//! A text-to-speech node for node-graph media tools. It sends text to an
//! OpenAI-compatible speech endpoint and turns the reply into the host's
//! AUDIO representation: a `(1, channels, samples)` float waveform in
//! [-1, 1] plus the sample rate read from the audio container.
//!
//! ## Pipeline
//!
//! 1. Build `POST <url>` with `{model, input, voice, return_audio, response_format}`
//!    and a bearer token when an API key is set.
//! 2. Reject transport failures and any status other than 200.
//! 3. Classify the reply: JSON with `file_path`, JSON with base64 `audio`,
//!    or a raw `audio/*` body.
//! 4. Decode the bytes as MP3 or WAV, normalize, de-interleave, add the batch axis.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openai_tts_node::{AudioFormat, TtsNode, TtsNodeConfig};
//!
//! fn main() -> openai_tts_node::Result<()> {
//!     let config = TtsNodeConfig::new("Hello from the graph")
//!         .with_url("http://localhost:3001/v1/audio/speech")
//!         .with_response_format(AudioFormat::Wav);
//!
//!     let audio = TtsNode::new()?.synthesize(&config)?;
//!     println!("{:?} @ {} Hz", audio.waveform.shape(), audio.sample_rate);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Node inputs, defaults, file loading, input schema |
//! | [`transport`] | Speech request body and HTTP clients |
//! | [`response`] | Reply classification and audio byte resolution |
//! | [`audio`] | MP3/WAV decoding and waveform shaping |
//! | [`node`] | Blocking and async synthesis entry points |

pub mod audio;
pub mod config;
pub mod node;
pub mod response;
pub mod transport;

pub use config::{AudioFormat, TtsNodeConfig};
pub use node::{synthesize, AsyncTtsNode, SynthesizedAudio, TtsNode};
pub use response::{AudioPayload, AudioSource, ResponseEnvelope};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, TransportError};
