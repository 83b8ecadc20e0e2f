mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use futcerto::domain::models::court::{Court, CourtPatch, NewCourtParams};
use serde_json::json;

fn patch(name: &str, location: &str, price: f64, max_players: i32, image_url: &str) -> serde_json::Value {
    json!({
        "name": name,
        "location": location,
        "price_per_hour": price,
        "max_players": max_players,
        "image_url": image_url
    })
}

#[tokio::test]
async fn test_dashboard_lists_only_own_courts() {
    let app = TestApp::new().await;
    let alice = app.manager().await;
    let bruno = app.manager().await;

    app.create_court(&alice, "Zeta Arena", "Rua Zeta, 1", 70.0, 10).await;
    app.create_court(&alice, "Alfa Arena", "Rua Alfa, 2", 70.0, 10).await;
    app.create_court(&bruno, "Beta Arena", "Rua Beta, 3", 70.0, 10).await;

    let res = app.request("GET", "/api/v1/manager/courts", Some(&alice), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    let names: Vec<&str> = body["courts"].as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Alfa Arena", "Zeta Arena"]);
}

#[tokio::test]
async fn test_players_cannot_use_manager_area() {
    let app = TestApp::new().await;
    let player = app.player().await;

    let res = app.request("GET", "/api/v1/manager/courts", Some(&player), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(res).await["kind"], "access_denied");

    let res = app.request("POST", "/api/v1/manager/courts", Some(&player), Some(json!({
        "name": "Minha Quadra", "location": "Rua Qualquer", "price_per_hour": 10.0,
        "max_players": 10, "latitude": 0.0, "longitude": 0.0
    }))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.request("GET", "/api/v1/manager/courts", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_foreign_court_is_denied_and_missing_court_is_not_found() {
    let app = TestApp::new().await;
    let owner = app.manager().await;
    let intruder = app.manager().await;
    let court_id = app.create_court(&owner, "Arena Privada", "Rua Fechada, 9", 70.0, 10).await;

    let res = app.request("GET", &format!("/api/v1/manager/courts/{}", court_id), Some(&intruder), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let denied = parse_body(res).await;
    assert_eq!(denied["error"], "Acesso Negado: Você não gerencia esta quadra.");

    let res = app.request("PUT", &format!("/api/v1/manager/courts/{}", court_id), Some(&intruder),
        Some(patch("Arena Tomada", "Rua Fechada, 9", 1.0, 10, ""))).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.request("GET", "/api/v1/manager/courts/missing", Some(&intruder), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let missing = parse_body(res).await;
    assert_ne!(missing["error"], denied["error"]);

    let res = app.request("GET", &format!("/api/v1/courts/{}", court_id), None, None).await;
    assert_eq!(parse_body(res).await["name"], "Arena Privada");
}

#[tokio::test]
async fn test_unowned_court_is_denied_to_every_manager() {
    let app = TestApp::new().await;
    let manager = app.manager().await;

    let court = Court::new(NewCourtParams {
        details: CourtPatch {
            name: "Quadra Municipal".into(),
            location: "Praça Central".into(),
            price_per_hour: 20.0,
            max_players: 10,
            image_url: None,
        },
        latitude: 0.0,
        longitude: 0.0,
        manager_id: None,
    });
    let court = app.state.court_repo.create(&court).await.unwrap();

    let res = app.request("GET", &format!("/api/v1/manager/courts/{}", court.id), Some(&manager), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_owner_updates_court() {
    let app = TestApp::new().await;
    let owner = app.manager().await;
    let court_id = app.create_court(&owner, "Arena Velha", "Rua Antiga, 1", 70.0, 10).await;

    let res = app.request("PUT", &format!("/api/v1/manager/courts/{}", court_id), Some(&owner),
        Some(patch("  Arena Nova  ", "Rua Nova, 2", 95.5, 12, "https://img.test/arena.png"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["name"], "Arena Nova");
    assert_eq!(body["price_per_hour"], 95.5);
    assert_eq!(body["max_players"], 12);
    assert_eq!(body["image_url"], "https://img.test/arena.png");
    assert_eq!(body["manager_id"], owner.user_id.as_str());

    let res = app.request("PUT", &format!("/api/v1/manager/courts/{}", court_id), Some(&owner),
        Some(patch("Arena Nova", "Rua Nova, 2", 95.5, 12, "   "))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(parse_body(res).await["image_url"].is_null());
}

#[tokio::test]
async fn test_update_validation() {
    let app = TestApp::new().await;
    let owner = app.manager().await;
    let court_id = app.create_court(&owner, "Arena Certa", "Rua Certa, 1", 70.0, 10).await;
    let uri = format!("/api/v1/manager/courts/{}", court_id);

    let cases = [
        patch("Ab", "Rua Certa, 1", 70.0, 10, ""),
        patch("Arena Certa", "Rua", 70.0, 10, ""),
        patch("Arena Certa", "Rua Certa, 1", 0.0, 10, ""),
        patch("Arena Certa", "Rua Certa, 1", 70.0, 0, ""),
        patch("Arena Certa", "Rua Certa, 1", 70.0, 10, "not a url"),
    ];

    for case in cases {
        let res = app.request("PUT", &uri, Some(&owner), Some(case.clone())).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {case}");
        assert_eq!(parse_body(res).await["kind"], "validation");
    }

    let res = app.request("GET", &uri, Some(&owner), None).await;
    assert_eq!(parse_body(res).await["name"], "Arena Certa");
}
