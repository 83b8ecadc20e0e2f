use axum::{extract::State, Json};
use crate::api::dtos::responses::ReservationsResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::profile::Profile;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

pub async fn my_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Profile>, AppError> {
    let profile = state.profile_repo.find_by_id(&user.id).await?
        .ok_or_else(|| AppError::NotFound("Perfil não encontrado.".into()))?;
    Ok(Json(profile))
}

/// Served from the reservations view; a booking by this player evicts the cached list.
pub async fn my_reservations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<ReservationsResponse>, AppError> {
    let reservations = state.reservations_view.for_player(&user.id).await?;
    Ok(Json(ReservationsResponse { reservations: reservations.as_ref().clone() }))
}
