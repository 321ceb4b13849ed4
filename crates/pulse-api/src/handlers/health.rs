//! Health check handler.

use axum::Json;
use axum::extract::State;

use pulse_core::error::{AppError, ErrorKind};
use pulse_database::NotificationStore;

use crate::dto::response::HealthResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /health
///
/// Reports healthy only when the notification store answers its
/// reachability probe; a failed probe surfaces as 503.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.store.ping().await.map_err(|e| {
        tracing::error!(error = %e, "Health probe failed");
        AppError::new(ErrorKind::ServiceUnavailable, "Storage unreachable")
    })?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
