// src/services/auth.rs

use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserStore,
    models::auth::{Claims, SessionContext},
};

/// Valida os tokens emitidos pelo provedor de identidade e resolve o papel
/// do usuário a partir do perfil salvo.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            users,
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Devolve o `sub` do token se a assinatura e a expiração forem válidas.
    pub fn validate_token(&self, token: &str) -> Result<Uuid, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("Token rejeitado: {}", e);
            AppError::InvalidToken
        })?;
        Ok(token_data.claims.sub)
    }

    /// Token válido + perfil existente = sessão.
    pub async fn resolve_session(&self, token: &str) -> Result<SessionContext, AppError> {
        let user_id = self.validate_token(token)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::ProfileNotFound)?;
        Ok(SessionContext::new(user.id, user.role))
    }
}
