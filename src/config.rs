//! Request configuration: the typed fields a host form supplies for one synthesis call.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use url::Url;

use crate::{Error, ErrorContext, Result};

pub const DEFAULT_TEXT: &str = "Hello world";
pub const DEFAULT_MODEL: &str = "default_tts_model";
pub const DEFAULT_VOICE: &str = "af_sky";
pub const DEFAULT_URL: &str = "http://localhost:3001/v1/audio/speech";

/// Audio container the server is asked to respond with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
}

impl AudioFormat {
    /// Lower-case wire name sent as `response_format`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "wav" => Ok(Self::Wav),
            other => Err(Error::configuration_with_context(
                format!("unsupported response format '{}' (expected mp3 or wav)", other),
                ErrorContext::new().with_field_path("response_format"),
            )),
        }
    }
}

impl<'de> Deserialize<'de> for AudioFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Everything one synthesis call needs.
///
/// Missing fields fall back to the node's form defaults, so partial YAML or
/// JSON documents load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TtsNodeConfig {
    /// Text to synthesize.
    pub text: String,
    /// Model identifier passed through to the endpoint.
    pub model: String,
    /// Voice identifier passed through to the endpoint.
    pub voice: String,
    /// Bearer token. Empty or absent means no Authorization header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Full URL of the speech endpoint.
    pub url: String,
    /// Container the server should answer with, and the one we decode.
    pub response_format: AudioFormat,
    /// Ask for inline audio (true) or a server-side file path (false).
    pub return_audio: bool,
}

impl Default for TtsNodeConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            api_key: None,
            url: DEFAULT_URL.to_string(),
            response_format: AudioFormat::Mp3,
            return_audio: true,
        }
    }
}

impl TtsNodeConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_response_format(mut self, format: AudioFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn with_return_audio(mut self, return_audio: bool) -> Self {
        self.return_audio = return_audio;
        self
    }

    /// The API key when it is worth sending; empty or blank keys yield `None`.
    pub fn bearer_token(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Check the endpoint URL before any I/O happens.
    pub fn validate(&self) -> Result<Url> {
        let url = Url::parse(self.url.trim()).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid endpoint URL: {}", e),
                ErrorContext::new()
                    .with_field_path("url")
                    .with_details(self.url.clone()),
            )
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::configuration_with_context(
                format!("unsupported URL scheme '{}'", other),
                ErrorContext::new()
                    .with_field_path("url")
                    .with_details(self.url.clone()),
            )),
        }
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| {
            Error::configuration_with_context(
                format!("failed to parse configuration: {}", e),
                ErrorContext::new().with_source("yaml"),
            )
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| {
            Error::configuration_with_context(
                format!("failed to parse configuration: {}", e),
                ErrorContext::new().with_source("json"),
            )
        })
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("failed to read configuration file: {}", e),
                ErrorContext::new().with_details(path.display().to_string()),
            )
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// JSON Schema describing the input form fields.
    pub fn input_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(TtsNodeConfig);
        serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
    }
}
