mod result;

pub use result::{AnalysisResult, first_of};

use crate::{
    Error, Result,
    backend::{InferenceBackend, QueueJoinPayload, SessionContext},
    config::BackendConfig,
};
use std::sync::Arc;
use tracing::info;

/// Drives one analysis through the backend: join the queue, then wait on the stream.
pub struct RelayHandler {
    backend: Arc<dyn InferenceBackend>,
    fn_index: u32,
    trigger_id: u32,
}

impl RelayHandler {
    pub fn new(backend: Arc<dyn InferenceBackend>, config: &BackendConfig) -> Self {
        Self {
            backend,
            fn_index: config.fn_index,
            trigger_id: config.trigger_id,
        }
    }

    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        if text.is_empty() {
            return Err(Error::InvalidInput);
        }

        let session = SessionContext::new();
        let payload = QueueJoinPayload::new(text, &session, self.fn_index, self.trigger_id);

        info!("Joining queue for session {}", session.session_id);
        let joined = self.backend.join_queue(&payload).await?;
        info!(
            "Queued event {} for session {}",
            joined.event_id, session.session_id
        );

        let output = self.backend.await_completion(&session).await?;
        let result = AnalysisResult::from_output(output)?;
        info!("Completed analysis for event {}", joined.event_id);

        Ok(result)
    }
}
