use super::types::{AnalyzeRequest, ErrorResponse, HealthResponse};
use crate::{Error, relay::{AnalysisResult, RelayHandler}};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayHandler>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Flask is running!".to_string(),
    })
}

pub async fn analyze(
    State(state): State<AppState>,
    request: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, (StatusCode, Json<ErrorResponse>)> {
    // An unreadable body carries no text, which is a client error.
    let text = match request {
        Ok(Json(request)) => request.text.unwrap_or_default(),
        Err(rejection) => {
            warn!("Rejected analyze request body: {}", rejection);
            String::new()
        }
    };

    info!("Received analyze request for text: {}", text);

    match state.relay.analyze(&text).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            let status = e.status_code();
            match &e {
                Error::InvalidInput => warn!("Analyze request without text"),
                Error::Internal(_)
                | Error::Network(_)
                | Error::Serialization(_)
                | Error::Io(_) => error!("Unexpected failure while analyzing: {:?}", e),
                _ => error!("Analyze request failed ({}): {}", status, e),
            }
            Err((status, Json(ErrorResponse::from(&e))))
        }
    }
}
