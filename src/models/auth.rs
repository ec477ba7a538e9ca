// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Consultant,
    Viewer,
}

impl UserRole {
    /// Visualizadores só leem.
    pub fn can_edit(self) -> bool {
        !matches!(self, UserRole::Viewer)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // Subject (ID do usuário)
    pub role: UserRole, // Papel global do usuário
    pub exp: usize,     // Expiration time (quando o token expira)
    pub iat: usize,     // Issued At (quando o token foi criado)
}
