use axum::{extract::{Path, State}, response::IntoResponse, Json, http::StatusCode};
use crate::api::dtos::requests::CreateBookingRequest;
use crate::api::extractors::maybe_auth::MaybeAuthUser;
use crate::domain::models::{reservation::ReservationSummary, slot::Slot};
use crate::domain::services::{booking_flow::TargetCourt, court_access::COURT_NOT_FOUND_MSG};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

/// Drives one booking flow for the caller: open on the court, apply the
/// selection, submit. Guests reach the flow too and are refused there.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(court_id): Path<String>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = match &user {
        Some(user) => state.profile_repo.find_by_id(&user.id).await?,
        None => None,
    };

    // A guest is refused by the flow itself, before any court or slot error.
    let court = match state.court_repo.find_by_id(&court_id).await? {
        Some(court) => Some(court),
        None if profile.is_some() => return Err(AppError::NotFound(COURT_NOT_FOUND_MSG.into())),
        None => None,
    };

    let slot = match payload.start_time.as_deref().map(str::parse::<Slot>).transpose() {
        Ok(slot) => slot,
        Err(e) if profile.is_some() => return Err(AppError::InvalidSelection(e.to_string())),
        Err(_) => None,
    };

    let flow = state.booking_flow(profile);
    if let Some(court) = &court {
        flow.open(TargetCourt::from(court));
    }
    if let Some(date) = payload.date {
        flow.select_date(date);
    }
    if let Some(slot) = slot {
        flow.select_start_time(slot);
    }

    let confirmation = flow.submit().await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// Target of the shareable link.
pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<Json<ReservationSummary>, AppError> {
    let reservation = state.booking_repo.find_by_id(&reservation_id).await?
        .ok_or_else(|| AppError::NotFound("Reserva não encontrada.".into()))?;
    Ok(Json(reservation))
}
