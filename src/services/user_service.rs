// src/services/user_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{
        db_utils::contains_pattern,
        error::{AppError, Resource},
        pagination::{Paged, Pagination},
        validation::ValidateForm,
    },
    db::UserStore,
    models::auth::{RegisterProfilePayload, SessionContext, User, UserSearchQuery, ANY_ROLE, SUPER_ADMIN},
};

pub const DEFAULT_USER_PAGE_LIMIT: u32 = 5;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Cria o perfil logo após o cadastro no provedor de identidade.
    /// O papel é sempre o padrão `user`.
    pub async fn register_profile(&self, subject: Uuid, payload: RegisterProfilePayload) -> Result<User, AppError> {
        payload.validate_form()?;
        let user = self.users.create_profile(subject, &payload).await?;
        tracing::info!("👤 Perfil criado para {}", user.id);
        Ok(user)
    }

    pub async fn me(&self, ctx: &SessionContext) -> Result<User, AppError> {
        let user_id = ctx.require(ANY_ROLE)?;
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::ProfileNotFound)
    }

    pub async fn search_users(&self, ctx: &SessionContext, query: UserSearchQuery) -> Result<Paged<User>, AppError> {
        ctx.require(SUPER_ADMIN)?;
        let page = Pagination::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_USER_PAGE_LIMIT),
        );
        let pattern = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(contains_pattern);

        let (items, total) = self
            .users
            .search(query.attribute.unwrap_or_default(), pattern.as_deref(), page)
            .await?;
        Ok(Paged::new(items, total, page))
    }

    pub async fn delete_user(&self, ctx: &SessionContext, user_id: Uuid) -> Result<(), AppError> {
        let admin = ctx.require(SUPER_ADMIN)?;
        if !self.users.delete(user_id).await? {
            return Err(AppError::NotFound(Resource::User));
        }
        tracing::info!("🗑️ Usuário {} removido por {}", user_id, admin);
        Ok(())
    }
}
