use crate::domain::models::{court::Court, profile::Profile};
use crate::error::AppError;

pub const ACCESS_DENIED_MSG: &str = "Acesso Negado: Você não gerencia esta quadra.";
pub const MANAGER_ONLY_MSG: &str = "Esta área é reservada para gestores de quadras.";
pub const COURT_NOT_FOUND_MSG: &str = "Quadra não encontrada.";

/// Requester must hold a manager profile.
pub fn require_manager(profile: Option<&Profile>) -> Result<&Profile, AppError> {
    match profile {
        Some(p) if p.is_manager() => Ok(p),
        _ => Err(AppError::AccessDenied(MANAGER_ONLY_MSG.into())),
    }
}

/// Gate for manager-scoped reads and writes: missing court and foreign court are distinct.
pub fn authorize_manager(court: Option<Court>, requester: &Profile) -> Result<Court, AppError> {
    let court = court.ok_or_else(|| AppError::NotFound(COURT_NOT_FOUND_MSG.into()))?;
    match court.manager_id.as_deref() {
        Some(owner) if owner == requester.id => Ok(court),
        _ => Err(AppError::AccessDenied(ACCESS_DENIED_MSG.into())),
    }
}
