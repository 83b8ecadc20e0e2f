use axum::{
    body::Body,
    extract::Request,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::extractors::api_key::require_api_key;
use crate::api::handlers::{auth, booking, config, court, health, manager, profile};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/config/public", get(config::public_config))

        // Auth
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/signout", post(auth::sign_out))
        .route("/auth/session", get(auth::current_session))

        // Court directory & booking
        .route("/courts", get(court::list_courts))
        .route("/courts/{court_id}", get(court::get_court))
        .route("/courts/{court_id}/bookings", post(booking::create_booking))
        .route("/reservations/{reservation_id}", get(booking::get_reservation))

        // Profile
        .route("/me/profile", get(profile::my_profile))
        .route("/me/reservations", get(profile::my_reservations))

        // Manager
        .route("/manager/courts", get(manager::list_my_courts).post(manager::create_court))
        .route("/manager/courts/{court_id}", get(manager::get_managed_court).put(manager::update_managed_court))

        .layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
