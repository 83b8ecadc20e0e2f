use axum::{extract::{Path, Query, State}, Json};
use crate::api::dtos::{requests::CourtsQuery, responses::CourtsResponse};
use crate::domain::models::court::{Court, CourtFilters};
use crate::domain::services::court_access::COURT_NOT_FOUND_MSG;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::debug;

pub async fn list_courts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourtsQuery>,
) -> Result<Json<CourtsResponse>, AppError> {
    let filters = CourtFilters::parse(
        query.search.as_deref(),
        query.price.as_deref(),
        query.capacity.as_deref(),
    )?;

    let courts = state.court_repo.query(&filters).await?;
    debug!(count = courts.len(), "Court directory query");

    Ok(Json(CourtsResponse { courts }))
}

pub async fn get_court(
    State(state): State<Arc<AppState>>,
    Path(court_id): Path<String>,
) -> Result<Json<Court>, AppError> {
    let court = state.court_repo.find_by_id(&court_id).await?
        .ok_or_else(|| AppError::NotFound(COURT_NOT_FOUND_MSG.into()))?;
    Ok(Json(court))
}
