use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::Serialize;
use url::Url;

use crate::config::TtsNodeConfig;
use crate::transport::TransportError;
use crate::{Error, Result};

/// JSON body of `POST <url>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
    pub voice: &'a str,
    pub return_audio: bool,
    pub response_format: &'static str,
}

impl<'a> SpeechRequest<'a> {
    pub fn from_config(config: &'a TtsNodeConfig) -> Self {
        Self {
            model: &config.model,
            input: &config.text,
            voice: &config.voice,
            return_audio: config.return_audio,
            response_format: config.response_format.as_str(),
        }
    }
}

/// Status, content type and body of an endpoint reply, fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Value of the `Content-Type` header, empty when the header is absent.
    pub content_type: String,
    pub body: Bytes,
}

impl RawResponse {
    fn content_type_of(headers: &HeaderMap) -> String {
        headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }
}

/// Blocking client: one thread issues the request and waits for the reply.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    pub fn post_speech(
        &self,
        url: &Url,
        request: &SpeechRequest<'_>,
        bearer: Option<&str>,
    ) -> Result<RawResponse> {
        let mut req = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }

        let response = req
            .send()
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        let status = response.status().as_u16();
        let content_type = RawResponse::content_type_of(response.headers());
        let body = response
            .bytes()
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Same request on a tokio runtime.
pub struct AsyncHttpTransport {
    client: reqwest::Client,
}

impl AsyncHttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn post_speech(
        &self,
        url: &Url,
        request: &SpeechRequest<'_>,
        bearer: Option<&str>,
    ) -> Result<RawResponse> {
        let mut req = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        let status = response.status().as_u16();
        let content_type = RawResponse::content_type_of(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
