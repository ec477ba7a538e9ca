// src/services/auth.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Claims, UserRole},
};

/// Emissão e validação dos tokens (HS256). Os usuários vivem fora deste
/// serviço; aqui só importam o ID e o papel gravados no token.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub fn create_token(&self, user_id: Uuid, role: UserRole, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user_id,
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_validate_with_the_same_secret() {
        let service = AuthService::new("segredo-de-teste".into());
        let user_id = Uuid::new_v4();
        let token = service.create_token(user_id, UserRole::Consultant, Duration::hours(1)).unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::Consultant);
    }

    #[test]
    fn foreign_or_expired_tokens_are_rejected() {
        let service = AuthService::new("segredo-de-teste".into());
        let other = AuthService::new("outro-segredo".into());
        let token = other.create_token(Uuid::new_v4(), UserRole::Admin, Duration::hours(1)).unwrap();
        assert!(matches!(service.validate_token(&token), Err(AppError::InvalidToken)));

        let expired = service
            .create_token(Uuid::new_v4(), UserRole::Admin, Duration::hours(-2))
            .unwrap();
        assert!(matches!(service.validate_token(&expired), Err(AppError::InvalidToken)));

        assert!(service.validate_token("não-é-um-jwt").is_err());
    }
}
