use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use crate::error::AppError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "apikey";

/// Every `/api` call must present the deployment's public key.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    match provided {
        Some(key) if key == state.config.public_api_key => Ok(next.run(request).await),
        _ => Err(AppError::Unauthorized),
    }
}
