//! API request handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::batch::{BatchDispatcher, SendReport, SendRequest};
use crate::smtp::TransportBuilder;

/// Shared application state
pub struct AppState {
    pub dispatcher: BatchDispatcher,
    pub transport_builder: Arc<dyn TransportBuilder>,
}

/// Successful send response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailsResponse {
    pub success: bool,
    pub success_count: usize,
    pub failed_count: usize,
    pub failed_emails: Vec<String>,
}

impl From<SendReport> for SendEmailsResponse {
    fn from(report: SendReport) -> Self {
        Self {
            success: true,
            success_count: report.success_count,
            failed_count: report.failed_count(),
            failed_emails: report.failed_emails,
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub message: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            success: false,
            message: msg.to_string(),
        }
    }
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /api/send-emails - Render and send a template to every recipient
pub async fn send_emails(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendRequest>,
) -> impl IntoResponse {
    match state
        .dispatcher
        .send_all(state.transport_builder.as_ref(), &req)
        .await
    {
        Ok(report) => (StatusCode::OK, Json(SendEmailsResponse::from(report))).into_response(),
        Err(e) => {
            error!("Send request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(&e.to_string())),
            )
                .into_response()
        }
    }
}
