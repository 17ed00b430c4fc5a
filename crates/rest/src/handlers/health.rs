//! Health check endpoint handler.
//!
//! A simple liveness endpoint for monitoring and load balancers that also
//! verifies store connectivity.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use calc_store::RateStore;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Store reachable
/// - `503 Service Unavailable` - Store check failed
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> ApiResult<Response>
where
    S: RateStore + 'static,
{
    debug!("processing health check request");

    state.store().ping().await.map_err(|e| ApiError::Unavailable {
        message: e.to_string(),
    })?;

    let body = serde_json::json!({
        "status": "healthy",
        "backend": state.store().backend_name(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    Ok((StatusCode::OK, Json(body)).into_response())
}
