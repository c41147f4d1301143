use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field or configuration key that caused the error (e.g., "url", "response.file_path")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the offending value)
    pub details: Option<String>,
    /// Stage that raised the error (e.g., "transport", "wav_decoder")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for a synthesis call.
///
/// Every failure is fatal to the call; nothing is retried and no partial
/// result is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or its body could not be received.
    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    /// The endpoint answered, but not with status 200 or a usable content type.
    #[error("Protocol error: {message}{}", format_context(.context))]
    Protocol {
        status: Option<u16>,
        message: String,
        context: ErrorContext,
    },

    /// The reply was well-formed HTTP but carried no usable audio bytes.
    #[error("Payload error: {message}{}", format_context(.context))]
    Payload {
        message: String,
        context: ErrorContext,
    },

    /// The audio bytes could not be decoded as the declared container.
    #[error("Decode error: {message}{}", format_context(.context))]
    Decode {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

/// Failure below the HTTP protocol level (DNS, refused connection, timeout).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn protocol(status: Option<u16>, msg: impl Into<String>) -> Self {
        Error::Protocol {
            status,
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn protocol_with_context(
        status: Option<u16>,
        msg: impl Into<String>,
        context: ErrorContext,
    ) -> Self {
        Error::Protocol {
            status,
            message: msg.into(),
            context,
        }
    }

    pub fn payload(msg: impl Into<String>) -> Self {
        Self::payload_with_context(msg, ErrorContext::new())
    }

    pub fn payload_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Payload {
            message: msg.into(),
            context,
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::decode_with_context(msg, ErrorContext::new())
    }

    pub fn decode_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Decode {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol { .. })
    }

    pub fn is_payload(&self) -> bool {
        matches!(self, Error::Payload { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// HTTP status carried by a protocol error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol { status, .. } => *status,
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Protocol { context, .. }
            | Error::Payload { context, .. }
            | Error::Decode { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            Error::Transport(_) => None,
        }
    }
}
