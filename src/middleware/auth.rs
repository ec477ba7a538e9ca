// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Claims, UserRole},
};

/// Valida o Bearer token e deixa as claims nas extensions da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Sem cabeçalho = 401, igual a token inválido.
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::InvalidToken)?;
    let claims = app_state.auth_service.validate_token(bearer.token())?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Usuário autenticado, extraído das claims colocadas pelo `auth_guard`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Visualizadores não alteram nada.
    pub fn require_editor(&self) -> Result<(), AppError> {
        if self.role.can_edit() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl From<&Claims> for AuthenticatedUser {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .map(AuthenticatedUser::from)
            .ok_or(AppError::InvalidToken)
    }
}
