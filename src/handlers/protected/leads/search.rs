use axum::extract::{rejection::QueryRejection, Query, State};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::filter::{LeadFilter, SearchParams};
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Lead;

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub leads: Vec<Lead>,
}

/// GET /leads/search - Every lead matching the filter parameters, newest first
pub async fn get(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<SearchResults> {
    let Query(params) = query?;
    let filter = LeadFilter::from_params(&params)?;
    if filter.is_empty() {
        tracing::debug!("Search without constraints; returning every lead");
    }

    let leads = state
        .store
        .search(&filter)
        .await
        .map_err(|e| ApiError::store("Failed to search leads", e))?;

    tracing::debug!("Search matched {} leads", leads.len());
    Ok(ApiResponse::success(SearchResults { leads }))
}
