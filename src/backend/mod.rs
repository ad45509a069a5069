mod client;
mod types;

pub use client::{InferenceBackend, QueueClient};
pub use types::{
    CompletedOutput, QueueJoinPayload, QueueJoinResult, SessionContext, StreamEvent,
};
