use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::{SignInRequest, SignUpRequest}, responses::SessionResponse};
use crate::api::extractors::auth::{ACCESS_COOKIE, REFRESH_COOKIE};
use crate::domain::models::identity::{AuthResponse, TokenPair};
use crate::domain::services::auth_service::{SignUpData, SignedIn};
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::info;

pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let signed_in = state.auth_service.sign_up(SignUpData {
        email: payload.email,
        password: payload.password,
        name: payload.name,
        phone: payload.phone,
        user_type: payload.user_type,
    }).await?;

    info!("User signed up: {}", signed_in.user.id);

    Ok((StatusCode::CREATED, Json(establish_session(&cookies, signed_in))))
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    let signed_in = state.auth_service.sign_in(&payload.email, &payload.password).await?;

    info!("User signed in: {}", signed_in.user.id);

    Ok(Json(establish_session(&cookies, signed_in)))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let refresh_cookie = cookies.get(REFRESH_COOKIE).ok_or(AppError::Unauthorized)?;
    let signed_in = state.auth_service.refresh(refresh_cookie.value()).await?;

    info!("Token refreshed for user: {}", signed_in.user.id);

    Ok(Json(establish_session(&cookies, signed_in)))
}

pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let raw_refresh = cookies.get(REFRESH_COOKIE).map(|c| c.value().to_string());
    state.auth_service.sign_out(raw_refresh.as_deref()).await?;

    cookies.remove(Cookie::build((ACCESS_COOKIE, "")).path("/").into());
    cookies.remove(Cookie::build((REFRESH_COOKIE, "")).path("/").into());

    Ok(StatusCode::OK)
}

/// Current session, or JSON `null` for a guest.
pub async fn current_session(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Json<Option<SessionResponse>>, AppError> {
    let Some(session) = cookies
        .get(ACCESS_COOKIE)
        .and_then(|c| state.auth_service.current_session(c.value()))
    else {
        return Ok(Json(None));
    };

    let profile = state.profile_repo.find_by_id(&session.user.id).await?;

    Ok(Json(Some(SessionResponse {
        user: session.user,
        expires_at: session.expires_at,
        profile,
    })))
}

fn establish_session(cookies: &Cookies, signed_in: SignedIn) -> AuthResponse {
    let SignedIn { tokens, user, profile } = signed_in;
    set_cookies(cookies, &tokens);
    AuthResponse { csrf_token: tokens.csrf_token, user, profile }
}

fn set_cookies(cookies: &Cookies, tokens: &TokenPair) {
    let mut access_c = Cookie::new(ACCESS_COOKIE, tokens.access_token.clone());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new(REFRESH_COOKIE, tokens.refresh_token.clone());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(true);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}
