use axum::extract::{rejection::JsonRejection, Path, State};
use axum::Extension;
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Lead, LeadPatch};

const NOT_FOUND: &str = "Lead not found";

#[derive(Debug, Serialize)]
pub struct LeadBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub lead: Lead,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
}

/// GET /leads/getlead/:id - Get a single lead
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<LeadBody> {
    let lead = state
        .store
        .find_by_id(&id)
        .await
        .map_err(|e| ApiError::store("Failed to fetch lead", e))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(ApiResponse::success(LeadBody { message: None, lead }))
}

/// PUT /leads/editlead/:id - Merge the supplied fields into a lead
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Result<Json<LeadPatch>, JsonRejection>,
) -> ApiResult<LeadBody> {
    let Json(patch) = body?;

    let blanked = patch.blanked_required_fields();
    if !blanked.is_empty() {
        let field_errors: HashMap<String, String> = blanked
            .iter()
            .map(|f| (f.to_string(), "cannot be empty".to_string()))
            .collect();
        return Err(ApiError::validation_error(
            format!("Required fields cannot be cleared: {}", blanked.join(", ")),
            Some(field_errors),
        ));
    }

    let lead = state
        .store
        .update(&id, patch)
        .await
        .map_err(|e| ApiError::store("Failed to update lead", e))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    tracing::info!("Updated lead {} by {}", lead.id, user.subject);
    Ok(ApiResponse::success(LeadBody {
        message: Some("Lead updated successfully"),
        lead,
    }))
}

/// DELETE /leads/deletelead/:id - Remove a lead
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let removed = state
        .store
        .delete(&id)
        .await
        .map_err(|e| ApiError::store("Failed to delete lead", e))?;

    if !removed {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    tracing::info!("Deleted lead {} by {}", id, user.subject);
    Ok(ApiResponse::success(Deleted {
        message: "Lead deleted successfully",
    }))
}
