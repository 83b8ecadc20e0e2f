pub mod sqlite_identity_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_profile_repo;
pub mod sqlite_court_repo;
pub mod sqlite_booking_repo;

pub mod postgres_identity_repo;
pub mod postgres_auth_repo;
pub mod postgres_profile_repo;
pub mod postgres_court_repo;
pub mod postgres_booking_repo;

use crate::domain::ports::StoreError;

// 2067 = SQLite unique constraint, 1555 = SQLite primary key, 23505 = PostgreSQL unique violation
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e.as_database_error() {
        Some(db_err) => {
            let code = db_err.code().unwrap_or_default();
            db_err.is_unique_violation() || matches!(code.as_ref(), "2067" | "1555" | "23505")
        }
        None => false,
    }
}

/// The only place a raw database error is turned into a reservation outcome.
pub(crate) fn decode_store_error(e: sqlx::Error) -> StoreError {
    if is_unique_violation(&e) {
        return StoreError::Conflict;
    }
    match e.as_database_error() {
        Some(db_err) => StoreError::Other(db_err.message().to_string()),
        None => StoreError::Other(e.to_string()),
    }
}
