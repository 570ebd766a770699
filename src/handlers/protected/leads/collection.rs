use axum::extract::{
    rejection::{JsonRejection, QueryRejection},
    Query, State,
};
use axum::Extension;
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Lead, LeadInput};

use super::utils::PageQuery;

#[derive(Debug, Serialize)]
pub struct LeadCreated {
    pub message: &'static str,
    pub lead: Lead,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPage {
    pub data: Vec<Lead>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// POST /leads/addlead - Create a lead
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<LeadInput>, JsonRejection>,
) -> ApiResult<LeadCreated> {
    let Json(input) = body?;

    let new_lead = input.validate().map_err(|missing| {
        let field_errors: HashMap<String, String> = missing
            .iter()
            .map(|f| (f.to_string(), "is required".to_string()))
            .collect();
        ApiError::validation_error(
            format!("Missing required fields: {}", missing.join(", ")),
            Some(field_errors),
        )
    })?;

    // The store's uniqueness guard still catches a racing insert
    let existing = state
        .store
        .find_by_email(&new_lead.email)
        .await
        .map_err(|e| ApiError::store("Failed to add lead", e))?;
    if existing.is_some() {
        return Err(ApiError::validation_error("Lead already exists with this email", None));
    }

    let lead = state
        .store
        .insert(new_lead)
        .await
        .map_err(|e| ApiError::store("Failed to add lead", e))?;

    tracing::info!("Added lead {} by {}", lead.id, user.subject);
    Ok(ApiResponse::created(LeadCreated {
        message: "Lead added successfully",
        lead,
    }))
}

/// GET /leads/getleads?page=&limit= - List leads newest first
pub async fn get(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<LeadPage> {
    let Query(query) = query?;
    let page = query.resolve(&state.config.pagination)?;

    let data = state
        .store
        .list(page.limit, page.offset())
        .await
        .map_err(|e| ApiError::store("Failed to fetch leads", e))?;
    let total = state
        .store
        .count()
        .await
        .map_err(|e| ApiError::store("Failed to fetch leads", e))?;

    Ok(ApiResponse::success(LeadPage {
        data,
        page: page.page,
        limit: page.limit,
        total,
        total_pages: page.total_pages(total),
    }))
}
