use super::types::*;
use crate::{Error, Result, config::BackendConfig};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use reqwest_eventsource::{Error as EventSourceError, Event, EventSource, retry::Never};
use serde_json::Value;
use tracing::{debug, info, warn};

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Submits a job to the backend queue.
    async fn join_queue(&self, payload: &QueueJoinPayload) -> Result<QueueJoinResult>;

    /// Reads the session's event stream until a completed job delivers output.
    async fn await_completion(&self, session: &SessionContext) -> Result<Value>;
}

/// Client for a queue-based inference backend speaking the join/data protocol.
pub struct QueueClient {
    client: reqwest::Client,
    config: BackendConfig,
}

impl QueueClient {
    pub fn new(config: BackendConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: BackendConfig) -> Self {
        Self { client, config }
    }

    async fn read_stream(&self, session: &SessionContext) -> Result<Value> {
        let url = self.config.data_url();
        info!("Listening for results at {}", url);

        let request = self
            .client
            .get(&url)
            .query(&[("session_hash", session.session_id.as_str())]);

        let mut events = EventSource::new(request)
            .map_err(|e| Error::internal(format!("Cannot open data stream: {}", e)))?;
        events.set_retry_policy(Box::new(Never));

        while let Some(event) = events.next().await {
            match event {
                Ok(Event::Open) => debug!("Data stream opened for session {}", session.session_id),
                Ok(Event::Message(message)) => {
                    if let Some(result) = handle_message(&message.data) {
                        events.close();
                        return Ok(result);
                    }
                }
                Err(EventSourceError::StreamEnded) => break,
                Err(EventSourceError::InvalidStatusCode(status, _)) => {
                    warn!("Data stream responded with status {}", status);
                    break;
                }
                Err(EventSourceError::InvalidContentType(content_type, _)) => {
                    warn!("Data stream responded with content type {:?}", content_type);
                    break;
                }
                Err(EventSourceError::Transport(e)) => return Err(Error::from_request(e)),
                Err(e) => return Err(Error::internal(format!("Data stream error: {}", e))),
            }
        }

        warn!(
            "Data stream for session {} closed without a result",
            session.session_id
        );
        Err(Error::StreamEndedWithoutResult)
    }
}

/// Inspects one stream message, returning the job output once it arrives.
fn handle_message(data: &str) -> Option<Value> {
    debug!("Stream event: {}", data);

    let event: StreamEvent = match serde_json::from_str(data) {
        Ok(event) => event,
        Err(e) => {
            warn!("Skipping malformed stream event: {}", e);
            return None;
        }
    };

    match &event {
        StreamEvent::ProcessStarts { .. } => info!("Process started"),
        StreamEvent::Estimation { rank, queue_size } => {
            info!("Queue position: {:?}/{:?}", rank, queue_size)
        }
        StreamEvent::Progress { progress_data } => debug!("Progress: {:?}", progress_data),
        StreamEvent::ProcessCompleted { output, success } => {
            let error = output.as_ref().and_then(|o| o.error.as_ref());
            if let Some(error) = error {
                warn!("Job completed with error (success={:?}): {}", success, error);
            }
        }
        StreamEvent::Other => debug!("Ignoring unrecognized stream event"),
    }

    let completed = matches!(event, StreamEvent::ProcessCompleted { .. });
    let result = event.into_result();
    if completed && result.is_none() {
        debug!("Completion event carried no output data, continuing");
    }
    result
}

#[async_trait]
impl InferenceBackend for QueueClient {
    async fn join_queue(&self, payload: &QueueJoinPayload) -> Result<QueueJoinResult> {
        let url = self.config.join_url();
        info!("Joining queue at {}", url);
        debug!("Join payload: {}", serde_json::to_string(payload)?);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .timeout(self.config.join_timeout())
            .send()
            .await
            .map_err(Error::from_request)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::from_request)?;

        info!("Join status: {}", status);
        debug!("Join response: {}", body);

        if status != StatusCode::OK {
            return Err(Error::BackendJoinFailed {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Value = serde_json::from_str(&body)?;
        QueueJoinResult::from_response(parsed)
    }

    async fn await_completion(&self, session: &SessionContext) -> Result<Value> {
        let deadline = self.config.stream_timeout();
        match tokio::time::timeout(deadline, self.read_stream(session)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Data stream for session {} exceeded {:?}",
                    session.session_id, deadline
                );
                Err(Error::Timeout)
            }
        }
    }
}
