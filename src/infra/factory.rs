use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::ports::{
    AuthRepository, BookingRepository, CourtRepository, IdentityRepository, ProfileRepository,
};
use crate::domain::services::{auth_service::AuthService, events::EventBus, reservations_view::ReservationsView};
use crate::infra::clipboard::HeadlessClipboard;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_booking_repo::PostgresBookingRepo,
    postgres_court_repo::PostgresCourtRepo, postgres_identity_repo::PostgresIdentityRepo,
    postgres_profile_repo::PostgresProfileRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_court_repo::SqliteCourtRepo, sqlite_identity_repo::SqliteIdentityRepo,
    sqlite_profile_repo::SqliteProfileRepo,
};

/// Storage adapters for one backend, before services are wired on top.
pub struct Repositories {
    pub identity_repo: Arc<dyn IdentityRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub court_repo: Arc<dyn CourtRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
}

impl Repositories {
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            identity_repo: Arc::new(SqliteIdentityRepo::new(pool.clone())),
            auth_repo: Arc::new(SqliteAuthRepo::new(pool.clone())),
            profile_repo: Arc::new(SqliteProfileRepo::new(pool.clone())),
            court_repo: Arc::new(SqliteCourtRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool)),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            identity_repo: Arc::new(PostgresIdentityRepo::new(pool.clone())),
            auth_repo: Arc::new(PostgresAuthRepo::new(pool.clone())),
            profile_repo: Arc::new(PostgresProfileRepo::new(pool.clone())),
            court_repo: Arc::new(PostgresCourtRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool)),
        }
    }
}

/// Wires services over the given adapters. Used by `bootstrap_state` and by tests.
pub fn assemble_state(config: &Config, repos: Repositories) -> Result<AppState, AppError> {
    let events = EventBus::new();

    let auth_service = Arc::new(AuthService::new(
        repos.identity_repo.clone(),
        repos.profile_repo.clone(),
        repos.auth_repo.clone(),
        events.clone(),
        config,
    )?);

    let reservations_view = Arc::new(ReservationsView::new(repos.booking_repo.clone()));

    Ok(AppState {
        config: config.clone(),
        identity_repo: repos.identity_repo,
        auth_repo: repos.auth_repo,
        profile_repo: repos.profile_repo,
        court_repo: repos.court_repo,
        booking_repo: repos.booking_repo,
        clipboard: Arc::new(HeadlessClipboard),
        auth_service,
        events,
        reservations_view,
    })
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse()?;
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;
        Repositories::postgres(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;
        Repositories::sqlite(pool)
    };

    assemble_state(config, repos)
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run Postgres migrations: {e}")))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to run SQLite migrations: {e}")))
}
