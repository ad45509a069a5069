use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Per-request correlation token binding a queue join to its data stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: String,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueJoinPayload {
    pub data: Vec<Value>,
    pub event_data: Option<Value>,
    pub fn_index: u32,
    pub trigger_id: u32,
    pub session_hash: String,
}

impl QueueJoinPayload {
    pub fn new(text: &str, session: &SessionContext, fn_index: u32, trigger_id: u32) -> Self {
        Self {
            data: vec![Value::String(text.to_string())],
            event_data: None,
            fn_index,
            trigger_id,
            session_hash: session.session_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueJoinResult {
    pub event_id: String,
}

impl QueueJoinResult {
    /// Extracts the event id from a parsed join response.
    pub fn from_response(response: Value) -> Result<Self> {
        match response.get("event_id").and_then(Value::as_str) {
            Some(event_id) if !event_id.is_empty() => Ok(Self {
                event_id: event_id.to_string(),
            }),
            _ => Err(Error::missing_event_id(response)),
        }
    }
}

/// One `data:` payload of the queue stream, discriminated by `msg`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum StreamEvent {
    ProcessStarts {
        #[serde(default)]
        event_id: Option<String>,
    },
    Estimation {
        #[serde(default)]
        rank: Option<i64>,
        #[serde(default)]
        queue_size: Option<i64>,
    },
    Progress {
        #[serde(default)]
        progress_data: Option<Value>,
    },
    ProcessCompleted {
        #[serde(default)]
        output: Option<CompletedOutput>,
        #[serde(default)]
        success: Option<bool>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompletedOutput {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl StreamEvent {
    /// Returns the first output value if this event finishes the job with data.
    pub fn into_result(self) -> Option<Value> {
        match self {
            Self::ProcessCompleted {
                output: Some(output),
                ..
            } => output.data.into_iter().next(),
            _ => None,
        }
    }
}
