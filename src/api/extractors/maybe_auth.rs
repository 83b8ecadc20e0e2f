use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::api::extractors::auth::{access_token, check_csrf};
use crate::domain::models::identity::SessionUser;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{debug, Span};

/// Caller identity when a valid session is present; guests get `None`.
pub struct MaybeAuthUser(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let Some(token) = access_token(parts) else {
            return Ok(MaybeAuthUser(None));
        };

        let Some(claims) = app_state.auth_service.decode_claims(&token) else {
            // Expired or forged token: treat as guest
            debug!("MaybeAuth: access token rejected, continuing as guest");
            return Ok(MaybeAuthUser(None));
        };

        check_csrf(parts, &claims)?;

        let user = SessionUser { id: claims.sub, email: claims.email };
        Span::current().record("user_id", &user.id);
        Ok(MaybeAuthUser(Some(user)))
    }
}
