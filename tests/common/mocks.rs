use async_trait::async_trait;
use emotion_relay::{
    Result,
    backend::{InferenceBackend, QueueJoinPayload, QueueJoinResult, SessionContext},
};
use serde_json::{Value, json};
use std::sync::Mutex;

type JoinFn = Box<dyn Fn(&QueueJoinPayload) -> Result<QueueJoinResult> + Send + Sync>;
type CompletionFn = Box<dyn Fn(&SessionContext) -> Result<Value> + Send + Sync>;

/// Mock inference backend that records every call it receives
pub struct MockBackend {
    join: JoinFn,
    completion: CompletionFn,
    pub joins: Mutex<Vec<QueueJoinPayload>>,
    pub streams: Mutex<Vec<SessionContext>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            join: Box::new(|_| {
                Ok(QueueJoinResult {
                    event_id: "event-1".to_string(),
                })
            }),
            completion: Box::new(|_| Ok(json!({"label": "joy", "score": 0.87}))),
            joins: Mutex::new(Vec::new()),
            streams: Mutex::new(Vec::new()),
        }
    }

    pub fn with_join<F>(mut self, join: F) -> Self
    where
        F: Fn(&QueueJoinPayload) -> Result<QueueJoinResult> + Send + Sync + 'static,
    {
        self.join = Box::new(join);
        self
    }

    pub fn with_completion<F>(mut self, completion: F) -> Self
    where
        F: Fn(&SessionContext) -> Result<Value> + Send + Sync + 'static,
    {
        self.completion = Box::new(completion);
        self
    }

    pub fn join_count(&self) -> usize {
        self.joins.lock().unwrap().len()
    }

    pub fn stream_count(&self) -> usize {
        self.streams.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn join_queue(&self, payload: &QueueJoinPayload) -> Result<QueueJoinResult> {
        self.joins.lock().unwrap().push(payload.clone());
        (self.join)(payload)
    }

    async fn await_completion(&self, session: &SessionContext) -> Result<Value> {
        self.streams.lock().unwrap().push(session.clone());
        (self.completion)(session)
    }
}
