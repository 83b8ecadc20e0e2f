mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{auth_headers, parse_body, TestApp, TEST_API_KEY};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_needs_no_api_key() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().uri("/health").body(Body::empty()).unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_rejects_missing_or_wrong_api_key() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().uri("/api/v1/courts").body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.router.clone().oneshot(
        Request::builder().uri("/api/v1/courts").header("apikey", "nope").body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.router.clone().oneshot(
        Request::builder().uri("/api/v1/courts").header("apikey", TEST_API_KEY).body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_config_exposes_map_token() {
    let app = TestApp::new().await;

    let res = app.request("GET", "/api/v1/config/public", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(res).await;
    assert_eq!(body["map_access_token"], "pk.test-map-token");
    assert_eq!(body["app_origin"], common::TEST_ORIGIN);
}

#[tokio::test]
async fn test_sign_up_creates_identity_and_profile() {
    let app = TestApp::new().await;

    let res = app.request("POST", "/api/v1/auth/signup", None, Some(json!({
        "email": "  Ana@Example.com ",
        "password": "secret123",
        "name": "Ana",
        "user_type": "manager"
    }))).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie_count = res.headers().get_all(header::SET_COOKIE).iter().count();
    assert_eq!(cookie_count, 2);

    let body = parse_body(res).await;
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["profile"]["name"], "Ana");
    assert_eq!(body["profile"]["user_type"], "manager");
    assert!(body["profile"]["phone"].is_null());
    assert!(body["csrf_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = TestApp::new().await;
    app.sign_up("dup@test.com", "secret123", "player").await;

    let res = app.request("POST", "/api/v1/auth/signup", None, Some(json!({
        "email": "DUP@test.com",
        "password": "another1",
        "name": "Other"
    }))).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["kind"], "conflict");
}

#[tokio::test]
async fn test_sign_up_validation() {
    let app = TestApp::new().await;

    let res = app.request("POST", "/api/v1/auth/signup", None, Some(json!({
        "email": "short@test.com", "password": "123", "name": "Short"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.request("POST", "/api/v1/auth/signup", None, Some(json!({
        "email": "not-an-email", "password": "secret123", "name": "Bad"
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_in_and_wrong_password() {
    let app = TestApp::new().await;
    app.sign_up("joao@test.com", "secret123", "player").await;

    let auth = app.sign_in("joao@test.com", "secret123").await;
    assert!(!auth.access_token.is_empty());

    let res = app.request("POST", "/api/v1/auth/signin", None, Some(json!({
        "email": "joao@test.com", "password": "wrong-password"
    }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.request("POST", "/api/v1/auth/signin", None, Some(json!({
        "email": "nobody@test.com", "password": "secret123"
    }))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_session_for_user_and_guest() {
    let app = TestApp::new().await;
    let auth = app.sign_up("maria@test.com", "secret123", "player").await;

    let res = app.request("GET", "/api/v1/auth/session", Some(&auth), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["user"]["id"], auth.user_id.as_str());
    assert_eq!(body["user"]["email"], "maria@test.com");
    assert_eq!(body["profile"]["user_type"], "player");

    let res = app.request("GET", "/api/v1/auth/session", None, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(parse_body(res).await.is_null());
}

#[tokio::test]
async fn test_refresh_rotates_and_old_token_is_spent() {
    let app = TestApp::new().await;
    let auth = app.sign_up("rot@test.com", "secret123", "player").await;

    let res = app.request("POST", "/api/v1/auth/refresh", Some(&auth), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("POST", "/api/v1/auth/refresh", Some(&auth), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_out_revokes_refresh_family() {
    let app = TestApp::new().await;
    let auth = app.sign_up("out@test.com", "secret123", "player").await;

    let res = app.request("POST", "/api/v1/auth/signout", Some(&auth), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("POST", "/api/v1/auth/refresh", Some(&auth), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_events_fire_on_sign_in() {
    let app = TestApp::new().await;
    let mut rx = app.state.auth_service.subscribe();

    app.sign_up("evt@test.com", "secret123", "player").await;
    app.sign_in("evt@test.com", "secret123").await;

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert!(matches!(first, futcerto::domain::services::events::SessionEvent::SignedUp(_)));
    assert!(matches!(second, futcerto::domain::services::events::SessionEvent::SignedIn(_)));
}

#[tokio::test]
async fn test_rotated_token_keeps_session_until_sign_out() {
    let app = TestApp::new().await;
    let first = app.sign_up("chain@test.com", "secret123", "player").await;

    let res = app.request("POST", "/api/v1/auth/refresh", Some(&first), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let second = auth_headers(res).await;
    assert_ne!(second.refresh_token, first.refresh_token);
    assert_eq!(second.user_id, first.user_id);

    let res = app.request("POST", "/api/v1/auth/refresh", Some(&second), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let third = auth_headers(res).await;

    let res = app.request("POST", "/api/v1/auth/signout", Some(&third), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.request("POST", "/api/v1/auth/refresh", Some(&third), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_failed_profile_write_does_not_lock_out_the_email() {
    let app = TestApp::new().await;
    sqlx::query("ALTER TABLE profiles RENAME TO profiles_offline").execute(&app.pool).await.unwrap();

    let res = app.request("POST", "/api/v1/auth/signup", None, Some(json!({
        "email": "retry@test.com", "password": "secret123", "name": "Retry"
    }))).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let (left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM identities WHERE email = 'retry@test.com'")
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(left, 0);

    sqlx::query("ALTER TABLE profiles_offline RENAME TO profiles").execute(&app.pool).await.unwrap();
    let auth = app.sign_up("retry@test.com", "secret123", "player").await;
    assert!(!auth.user_id.is_empty());
}
