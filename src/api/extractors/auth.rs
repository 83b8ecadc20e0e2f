use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::identity::{Claims, SessionUser};
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

pub struct AuthUser(pub SessionUser);

pub(crate) fn access_token(parts: &Parts) -> Option<String> {
    parts.extensions.get::<Cookies>()?
        .get(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
}

/// Mutating requests must echo the CSRF token embedded in the access token.
pub(crate) fn check_csrf(parts: &Parts, claims: &Claims) -> Result<(), AppError> {
    let method = &parts.method;
    if method == "GET" || method == "HEAD" || method == "OPTIONS" {
        return Ok(());
    }
    let header = parts.headers.get(CSRF_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AccessDenied("CSRF token missing".into()))?;

    if header != claims.csrf_token {
        return Err(AppError::AccessDenied("CSRF token mismatch".into()));
    }
    Ok(())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let token = access_token(parts).ok_or(AppError::AuthRequired)?;
        let claims = app_state.auth_service.decode_claims(&token).ok_or(AppError::AuthRequired)?;
        check_csrf(parts, &claims)?;

        let user = SessionUser { id: claims.sub, email: claims.email };
        Span::current().record("user_id", &user.id);

        Ok(AuthUser(user))
    }
}
