use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - Service information
pub async fn root_get() -> Json<Value> {
    Json(json!({
        "success": true,
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "leads": "/leads/*",
            "health": "/health"
        }
    }))
}

/// GET /health - Store liveness
pub async fn health_get(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Err(e) = state.store.health_check().await {
        tracing::warn!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("Lead store is unreachable"));
    }

    Ok(Json(json!({
        "success": true,
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339()
    })))
}
