use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Text required")]
    InvalidInput,

    #[error("Failed to join queue: backend returned {status}")]
    BackendJoinFailed { status: u16, body: String },

    #[error("Backend protocol error: {message}")]
    BackendProtocol { message: String, response: Value },

    #[error("Request timeout")]
    Timeout,

    #[error("Stream ended without result")]
    StreamEndedWithoutResult,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn missing_event_id(response: Value) -> Self {
        Self::BackendProtocol {
            message: "No event_id in response".to_string(),
            response,
        }
    }

    /// Reclassifies client timeouts so callers can tell a slow backend from a failing one.
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    /// Stable tag reported in the `type` field of internal error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::BackendJoinFailed { .. } => "BackendJoinFailed",
            Self::BackendProtocol { .. } => "BackendProtocolError",
            Self::Timeout => "Timeout",
            Self::StreamEndedWithoutResult => "StreamEndedWithoutResult",
            Self::Config(_) => "Config",
            Self::Serialization(_) => "Serialization",
            Self::Yaml(_) => "Yaml",
            Self::Io(_) => "Io",
            Self::Network(_) => "Network",
            Self::AddrParse(_) => "AddrParse",
            Self::Internal(_) => "Internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Network(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
