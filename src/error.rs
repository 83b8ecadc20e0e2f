use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const INCOMPLETE_SELECTION_MSG: &str = "Por favor selecione data e horário";
pub const SLOT_CONFLICT_MSG: &str = "Este horário já está reservado. Escolha outro horário.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Authentication required")]
    AuthRequired,
    #[error("Por favor selecione data e horário")]
    IncompleteSelection,
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    #[error("Este horário já está reservado. Escolha outro horário.")]
    SlotConflict,
    #[error("A submission is already in progress")]
    SubmissionInProgress,
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    SubmissionFailed(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

/// Transient user-facing message: a title and a human-readable description.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::AuthRequired => "auth_required",
            AppError::IncompleteSelection => "incomplete_selection",
            AppError::InvalidSelection(_) => "invalid_selection",
            AppError::SlotConflict => "slot_conflict",
            AppError::SubmissionInProgress => "submission_in_progress",
            AppError::AccessDenied(_) => "access_denied",
            AppError::NotFound(_) => "not_found",
            AppError::SubmissionFailed(_) => "submission_failed",
            AppError::Unauthorized => "unauthorized",
            AppError::Conflict(_) => "conflict",
            AppError::Validation(_) => "validation",
            AppError::Internal | AppError::InternalWithMsg(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AuthRequired | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::IncompleteSelection | AppError::InvalidSelection(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::SlotConflict | AppError::SubmissionInProgress | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SubmissionFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn notification(&self) -> Notification {
        let (title, description) = match self {
            AppError::AuthRequired => ("Login necessário", "Entre na sua conta para continuar.".to_string()),
            AppError::IncompleteSelection => ("Erro na reserva", INCOMPLETE_SELECTION_MSG.to_string()),
            AppError::InvalidSelection(msg) => ("Erro na reserva", msg.clone()),
            AppError::SlotConflict => ("Erro na reserva", SLOT_CONFLICT_MSG.to_string()),
            AppError::SubmissionInProgress => ("Erro na reserva", "Aguarde a conclusão da reserva em andamento.".to_string()),
            AppError::SubmissionFailed(msg) => ("Erro na reserva", msg.clone()),
            AppError::AccessDenied(msg) => ("Acesso Negado", msg.clone()),
            AppError::NotFound(msg) => ("Não encontrado", msg.clone()),
            AppError::Unauthorized => ("Não autorizado", "Credenciais inválidas ou sessão expirada.".to_string()),
            AppError::Conflict(msg) => ("Conflito", msg.clone()),
            AppError::Validation(msg) => ("Dados inválidos", msg.clone()),
            AppError::Database(_) | AppError::Internal | AppError::InternalWithMsg(_) => {
                ("Erro inesperado", "Ocorreu um erro. Tente novamente.".to_string())
            }
        };
        Notification { title: title.to_string(), description }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => error!("Database error: {:?}", e),
            AppError::InternalWithMsg(msg) => error!("Internal error: {}", msg),
            _ => {}
        }

        let status = self.status();
        let notification = self.notification();
        let body = Json(json!({
            "error": notification.description,
            "kind": self.kind(),
            "title": notification.title,
        }));

        (status, body).into_response()
    }
}
