use futcerto::{
    api::router::create_router,
    background::start_event_listeners,
    config::Config,
    domain::models::reservation::ReservationStatus,
    infra::factory::{assemble_state, run_sqlite_migrations, Repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, Response, header},
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::Value;

pub const TEST_API_KEY: &str = "test-public-key";
pub const TEST_ORIGIN: &str = "http://futcerto.test";

pub struct AuthHeaders {
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
    pub user_id: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await.expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            public_api_key: TEST_API_KEY.to_string(),
            map_access_token: "pk.test-map-token".to_string(),
            app_origin: TEST_ORIGIN.to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            timezone: chrono_tz::America::Sao_Paulo,
            initial_reservation_status: ReservationStatus::Pending,
        };

        let state = Arc::new(
            assemble_state(&config, Repositories::sqlite(pool.clone())).expect("Failed to assemble state"),
        );

        start_event_listeners(state.clone());

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a request with the api key; attaches the session cookie and CSRF header when given.
    pub async fn request(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("apikey", TEST_API_KEY);

        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}; refresh_token={}", auth.access_token, auth.refresh_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn sign_up(&self, email: &str, password: &str, user_type: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "email": email,
            "password": password,
            "name": "Test User",
            "phone": "41999990000",
            "user_type": user_type
        });
        let response = self.request("POST", "/api/v1/auth/signup", None, Some(payload)).await;

        if !response.status().is_success() {
            panic!("Sign-up failed in test helper: status {}", response.status());
        }
        auth_headers(response).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({ "email": email, "password": password });
        let response = self.request("POST", "/api/v1/auth/signin", None, Some(payload)).await;

        if !response.status().is_success() {
            panic!("Sign-in failed in test helper: status {}", response.status());
        }
        auth_headers(response).await
    }

    pub async fn player(&self) -> AuthHeaders {
        self.sign_up(&format!("player-{}@test.com", Uuid::new_v4()), "secret123", "player").await
    }

    pub async fn manager(&self) -> AuthHeaders {
        self.sign_up(&format!("manager-{}@test.com", Uuid::new_v4()), "secret123", "manager").await
    }

    /// Creates a court owned by `manager` and returns its id.
    pub async fn create_court(&self, manager: &AuthHeaders, name: &str, location: &str, price: f64, max_players: i32) -> String {
        let payload = serde_json::json!({
            "name": name,
            "location": location,
            "price_per_hour": price,
            "max_players": max_players,
            "image_url": "",
            "latitude": -25.43,
            "longitude": -49.27
        });
        let response = self.request("POST", "/api/v1/manager/courts", Some(manager), Some(payload)).await;

        if !response.status().is_success() {
            panic!("Court creation failed in test helper: status {}", response.status());
        }
        parse_body(response).await["id"].as_str().unwrap().to_string()
    }
}

fn cookie_value(cookies: &[String], name: &str) -> String {
    let prefix = format!("{}=", name);
    let cookie = cookies.iter()
        .find(|c| c.starts_with(&prefix))
        .unwrap_or_else(|| panic!("No {} cookie returned", name));

    let start = prefix.len();
    let end = cookie[start..].find(';').unwrap_or(cookie.len() - start);
    cookie[start..start + end].to_string()
}

pub async fn auth_headers(response: Response<Body>) -> AuthHeaders {
    let cookies: Vec<String> = response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .collect();

    let access_token = cookie_value(&cookies, "access_token");
    let refresh_token = cookie_value(&cookies, "refresh_token");

    let body_json = parse_body(response).await;
    let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();
    let user_id = body_json["user"]["id"].as_str().expect("No user id in body").to_string();

    AuthHeaders {
        access_token,
        refresh_token,
        csrf_token,
        user_id,
    }
}

pub async fn parse_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
