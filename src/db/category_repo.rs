// src/db/category_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{on_foreign_key_violation, on_unique_violation},
        error::AppError,
    },
    models::category::{Category, CategoryPayload},
};

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Falha com `CategoryAlreadyExists` se o título já existir.
    async fn insert(&self, payload: &CategoryPayload) -> Result<Category, AppError>;

    async fn list(&self) -> Result<Vec<Category>, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Category>, AppError>;

    async fn update(&self, id: Uuid, payload: &CategoryPayload) -> Result<Option<Category>, AppError>;

    /// Falha com `CategoryInUse` se algum material ou produto ainda apontar para ela.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn insert(&self, payload: &CategoryPayload) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (title, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, AppError::CategoryAlreadyExists))
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn update(&self, id: Uuid, payload: &CategoryPayload) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET title = $2, description = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, AppError::CategoryAlreadyExists))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_foreign_key_violation(e, AppError::CategoryInUse))?;
        Ok(result.rows_affected() > 0)
    }
}
