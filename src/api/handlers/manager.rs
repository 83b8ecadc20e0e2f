use axum::{extract::{Path, State}, response::IntoResponse, Json, http::StatusCode};
use crate::api::dtos::{requests::{CreateCourtRequest, UpdateCourtRequest}, responses::CourtsResponse};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::{court::{Court, NewCourtParams}, identity::SessionUser, profile::Profile};
use crate::domain::services::court_access::{authorize_manager, require_manager};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

async fn manager_profile(state: &AppState, user: &SessionUser) -> Result<Profile, AppError> {
    let profile = state.profile_repo.find_by_id(&user.id).await?;
    require_manager(profile.as_ref()).cloned()
}

/// Dashboard listing: only the requester's courts.
pub async fn list_my_courts(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<CourtsResponse>, AppError> {
    let manager = manager_profile(&state, &user).await?;
    let courts = state.court_repo.list_by_manager(&manager.id).await?;
    Ok(Json(CourtsResponse { courts }))
}

pub async fn create_court(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateCourtRequest>,
) -> Result<impl IntoResponse, AppError> {
    let manager = manager_profile(&state, &user).await?;
    let details = payload.details.validated()?;

    let court = Court::new(NewCourtParams {
        details,
        latitude: payload.latitude,
        longitude: payload.longitude,
        manager_id: Some(manager.id.clone()),
    });
    let created = state.court_repo.create(&court).await?;

    info!(court_id = %created.id, manager_id = %manager.id, "Court created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_managed_court(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(court_id): Path<String>,
) -> Result<Json<Court>, AppError> {
    let manager = manager_profile(&state, &user).await?;
    let court = authorize_manager(state.court_repo.find_by_id(&court_id).await?, &manager)?;
    Ok(Json(court))
}

pub async fn update_managed_court(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(court_id): Path<String>,
    Json(payload): Json<UpdateCourtRequest>,
) -> Result<Json<Court>, AppError> {
    let manager = manager_profile(&state, &user).await?;
    let court = authorize_manager(state.court_repo.find_by_id(&court_id).await?, &manager)?;
    let patch = payload.validated()?;

    let updated = state.court_repo.update(&court.id, &patch).await?;

    info!(court_id = %updated.id, "Court updated");
    Ok(Json(updated))
}
