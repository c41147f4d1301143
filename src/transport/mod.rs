//! HTTP plumbing for the speech endpoint.

mod http;

pub use crate::error::TransportError;
pub use http::{AsyncHttpTransport, HttpTransport, RawResponse, SpeechRequest};
