use crate::Error;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Map::new(),
        }
    }

    fn with(mut self, key: &str, value: Value) -> Self {
        self.details.insert(key.to_string(), value);
        self
    }
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        if error.status_code() == StatusCode::GATEWAY_TIMEOUT {
            return Self::new("Request timeout");
        }

        match error {
            Error::InvalidInput => Self::new("Text required"),
            Error::BackendJoinFailed { status, body } => Self::new("Failed to join queue")
                .with("status", json!(status))
                .with("response", json!(body)),
            Error::BackendProtocol { message, response } => {
                Self::new(message.clone()).with("response", response.clone())
            }
            Error::StreamEndedWithoutResult => Self::new("Stream ended without result"),
            other => Self::new(other.to_string()).with("type", json!(other.kind())),
        }
    }
}
