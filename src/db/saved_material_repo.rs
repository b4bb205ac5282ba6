// src/db/saved_material_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::on_link_violation,
        error::{AppError, Resource},
    },
    models::material::SavedMaterialEntry,
};

#[async_trait]
pub trait SavedMaterialStore: Send + Sync {
    /// `DuplicateSaved` se já estiver salvo, `NotFound(Material)` se o material não existir.
    async fn save(&self, user_id: Uuid, material_id: Uuid) -> Result<(), AppError>;

    async fn remove(&self, user_id: Uuid, material_id: Uuid) -> Result<(), AppError>;

    async fn list(&self, user_id: Uuid) -> Result<Vec<SavedMaterialEntry>, AppError>;

    async fn exists(&self, user_id: Uuid, material_id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct SavedMaterialRepository {
    pool: PgPool,
}

impl SavedMaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedMaterialStore for SavedMaterialRepository {
    async fn save(&self, user_id: Uuid, material_id: Uuid) -> Result<(), AppError> {
        sqlx::query("INSERT INTO saved_materials (user_id, material_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(material_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                on_link_violation(e, AppError::DuplicateSaved, AppError::NotFound(Resource::Material))
            })?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, material_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM saved_materials WHERE user_id = $1 AND material_id = $2")
            .bind(user_id)
            .bind(material_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<SavedMaterialEntry>, AppError> {
        let entries = sqlx::query_as::<_, SavedMaterialEntry>(
            r#"
            SELECT m.*, c.title AS category_title, s.created_at AS saved_at
            FROM saved_materials s
            JOIN materials m ON m.id = s.material_id
            LEFT JOIN categories c ON c.id = m.category_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn exists(&self, user_id: Uuid, material_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM saved_materials WHERE user_id = $1 AND material_id = $2)",
        )
        .bind(user_id)
        .bind(material_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
