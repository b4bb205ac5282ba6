// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::{AppError, Denial};

// Espelha o ENUM `user_role` do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    AdminKomunitas,
    AdminPemerintah,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::AdminKomunitas => "admin_komunitas",
            Role::AdminPemerintah => "admin_pemerintah",
            Role::SuperAdmin => "super_admin",
        }
    }
}

// ---
// Conjuntos de capacidade. Cada operação verifica um único conjunto.
// ---
pub const COMMUNITY: &[Role] = &[Role::AdminKomunitas, Role::SuperAdmin];
pub const GOVERNMENT: &[Role] = &[Role::AdminPemerintah];
pub const SUPER_ADMIN: &[Role] = &[Role::SuperAdmin];
pub const MEMBER: &[Role] = &[Role::User];
pub const ANY_ROLE: &[Role] = &[
    Role::User,
    Role::AdminKomunitas,
    Role::AdminPemerintah,
    Role::SuperAdmin,
];

/// Identidade da requisição, resolvida uma vez no middleware e passada
/// explicitamente para cada operação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl SessionContext {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Devolve o id do usuário se o papel dele estiver no conjunto permitido.
    pub fn require(&self, allowed: &'static [Role]) -> Result<Uuid, AppError> {
        if allowed.contains(&self.role) {
            Ok(self.user_id)
        } else {
            tracing::warn!(
                "User {} with role '{}' attempted an action requiring one of {:?}",
                self.user_id,
                self.role.as_str(),
                allowed
            );
            Err(AppError::Forbidden(Denial::MissingRole(allowed)))
        }
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}

// Perfil vindo da tabela 'users'
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "Yohanes Wenda")]
    pub user_name: String,
    #[schema(example = "yohanes@papuamandiri.id")]
    pub user_email: String,
    pub role: Role,
    #[schema(example = "Jayapura")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Dados para criar o perfil logo após o cadastro no provedor de identidade
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProfilePayload {
    #[validate(length(min = 8, message = "Nama lengkap wajib diisi (minimal 8 karakter)"))]
    pub full_name: String,

    #[validate(email(message = "Email tidak valid"))]
    pub email: String,

    pub location: Option<String>,
}

impl crate::common::validation::ValidateForm for RegisterProfilePayload {
    const FIELD_ORDER: &'static [&'static str] = &["full_name", "email"];
}

// Coluna usada no filtro da busca de usuários
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserSearchAttribute {
    #[default]
    UserName,
    UserEmail,
    Location,
}

impl UserSearchAttribute {
    pub fn column(&self) -> &'static str {
        match self {
            UserSearchAttribute::UserName => "user_name",
            UserSearchAttribute::UserEmail => "user_email",
            UserSearchAttribute::Location => "location",
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchQuery {
    pub q: Option<String>,
    pub attribute: Option<UserSearchAttribute>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// Estrutura de dados ("claims") dentro do JWT do provedor de identidade
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // Subject (ID do usuário)
    pub exp: usize,  // Expiration time
    #[serde(default)]
    pub iat: Option<usize>,
}
