// src/services/category_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, Resource},
        validation::ValidateForm,
    },
    db::CategoryStore,
    models::{
        auth::{SessionContext, SUPER_ADMIN},
        category::{Category, CategoryPayload},
    },
};

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryStore>) -> Self {
        Self { categories }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.categories.list().await
    }

    pub async fn create_category(&self, ctx: &SessionContext, payload: CategoryPayload) -> Result<Category, AppError> {
        ctx.require(SUPER_ADMIN)?;
        let payload = payload.normalized();
        payload.validate_form()?;

        let category = self.categories.insert(&payload).await?;
        tracing::info!("🏷️ Kategori '{}' criada", category.title);
        Ok(category)
    }

    pub async fn update_category(
        &self,
        ctx: &SessionContext,
        category_id: Uuid,
        payload: CategoryPayload,
    ) -> Result<Category, AppError> {
        ctx.require(SUPER_ADMIN)?;
        let payload = payload.normalized();
        payload.validate_form()?;

        self.categories
            .update(category_id, &payload)
            .await?
            .ok_or(AppError::NotFound(Resource::Category))
    }

    pub async fn delete_category(&self, ctx: &SessionContext, category_id: Uuid) -> Result<(), AppError> {
        ctx.require(SUPER_ADMIN)?;
        if !self.categories.delete(category_id).await? {
            return Err(AppError::NotFound(Resource::Category));
        }
        Ok(())
    }
}
