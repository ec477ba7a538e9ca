use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Validação (400) ---
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("ID hierárquico inválido: '{0}'")]
    InvalidHierarchyId(String),

    #[error("Status de maturidade inválido: '{0}'")]
    InvalidMaturityStatus(String),

    #[error("Parâmetro inválido: {0}")]
    InvalidInput(String),

    #[error("As avaliações pertencem a organizações diferentes")]
    OrganizationMismatch,

    // --- Não encontrado (404) ---
    #[error("Organização não encontrada: {0}")]
    OrganizationNotFound(Uuid),

    #[error("Avaliação não encontrada: {0}")]
    EvaluationNotFound(Uuid),

    #[error("Entrada {entry_id} não encontrada na avaliação {evaluation_id}")]
    EntryNotFound { entry_id: Uuid, evaluation_id: Uuid },

    #[error("Elemento do PCF não encontrado: '{0}'")]
    NodeNotFound(String),

    #[error("O elemento '{node_id}' referencia o pai '{parent_id}', que não existe")]
    ParentNodeNotFound { node_id: String, parent_id: String },

    // --- Conflito (409) ---
    #[error("Registro duplicado: {0}")]
    Conflict(String),

    // --- Acesso ---
    #[error("Token inválido")]
    InvalidToken,

    #[error("Sem permissão para esta ação")]
    Forbidden,

    // Variante para erros de banco de dados (exemplo com sqlx)
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidHierarchyId(_)
            | AppError::InvalidMaturityStatus(_)
            | AppError::InvalidInput(_)
            | AppError::OrganizationMismatch => StatusCode::BAD_REQUEST,

            AppError::OrganizationNotFound(_)
            | AppError::EvaluationNotFound(_)
            | AppError::EntryNotFound { .. }
            | AppError::NodeNotFound(_)
            | AppError::ParentNodeNotFound { .. } => StatusCode::NOT_FOUND,

            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidToken | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,

            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converte violação de unicidade em `Conflict`; o resto segue como erro de banco.
    pub fn from_unique_violation(e: sqlx::Error, what: &str) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Conflict(what.to_string());
            }
        }
        AppError::DatabaseError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AppError::ValidationError(errors) = &self {
            // Retorna todos os detalhes da validação, campo a campo.
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": "Um ou mais campos são inválidos.",
                "details": details,
            }));
            return (status, body).into_response();
        }

        // Erros 5xx não expõem detalhes; o `tracing` registra a mensagem completa.
        let message = if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
            "Ocorreu um erro inesperado.".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_kinds_to_status_codes() {
        assert_eq!(AppError::InvalidHierarchyId("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::OrganizationMismatch.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::EntryNotFound { entry_id: Uuid::nil(), evaluation_id: Uuid::nil() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::Conflict("entrada".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let response = AppError::DatabaseError(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
