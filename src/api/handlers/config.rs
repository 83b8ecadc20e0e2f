use axum::{extract::State, Json};
use crate::api::dtos::responses::PublicConfigResponse;
use crate::state::AppState;
use std::sync::Arc;

/// Values the map view needs; the key itself never appears here.
pub async fn public_config(State(state): State<Arc<AppState>>) -> Json<PublicConfigResponse> {
    Json(PublicConfigResponse {
        map_access_token: state.config.map_access_token.clone(),
        app_origin: state.config.app_origin.clone(),
    })
}
