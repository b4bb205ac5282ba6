// src/db/material_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Pagination},
    models::material::{
        Material, MaterialForm, MaterialPatch, MaterialSortField, MaterialSuggestion,
        MaterialWithCategory, SortOrder,
    },
};

/// Filtro já normalizado da busca de materiais.
#[derive(Debug, Clone)]
pub struct MaterialFilter {
    /// Padrão ILIKE (`%termo%`)
    pub pattern: Option<String>,
    pub sort_by: MaterialSortField,
    pub sort_order: SortOrder,
    pub page: Pagination,
}

#[async_trait]
pub trait MaterialStore: Send + Sync {
    async fn insert(&self, uploader: Uuid, form: &MaterialForm) -> Result<Material, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<MaterialWithCategory>, AppError>;

    async fn list_all(&self) -> Result<Vec<MaterialWithCategory>, AppError>;

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Material>, AppError>;

    async fn search(&self, filter: &MaterialFilter) -> Result<(Vec<MaterialWithCategory>, i64), AppError>;

    async fn suggestions(&self, prefix_pattern: &str, limit: i64) -> Result<Vec<MaterialSuggestion>, AppError>;

    async fn popular(&self, limit: i64) -> Result<Vec<MaterialWithCategory>, AppError>;

    async fn update(&self, id: Uuid, patch: &MaterialPatch) -> Result<Option<Material>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Incrementa o contador de visualizações e devolve o novo valor.
    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>, AppError>;

    /// Materiais cujo título ou descrição casa com qualquer um dos padrões ILIKE.
    async fn matching_any(&self, patterns: &[String], limit: i64) -> Result<Vec<Material>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}

#[derive(Clone)]
pub struct MaterialRepository {
    pool: PgPool,
}

impl MaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaterialStore for MaterialRepository {
    async fn insert(&self, uploader: Uuid, form: &MaterialForm) -> Result<Material, AppError> {
        let material = sqlx::query_as::<_, Material>(
            r#"
            INSERT INTO materials
                (title, description, image_url, video_url, steps, category_id, uploader_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&form.title)
        .bind(&form.description)
        .bind(&form.image_url)
        .bind(&form.video_url)
        .bind(&form.steps)
        .bind(form.category_id)
        .bind(uploader)
        .fetch_one(&self.pool)
        .await?;
        Ok(material)
    }

    async fn find(&self, id: Uuid) -> Result<Option<MaterialWithCategory>, AppError> {
        let material = sqlx::query_as::<_, MaterialWithCategory>(
            r#"
            SELECT m.*, c.title AS category_title
            FROM materials m
            LEFT JOIN categories c ON c.id = m.category_id
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(material)
    }

    async fn list_all(&self) -> Result<Vec<MaterialWithCategory>, AppError> {
        let materials = sqlx::query_as::<_, MaterialWithCategory>(
            r#"
            SELECT m.*, c.title AS category_title
            FROM materials m
            LEFT JOIN categories c ON c.id = m.category_id
            ORDER BY m.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(materials)
    }

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Material>, AppError> {
        let materials = sqlx::query_as::<_, Material>(
            "SELECT * FROM materials WHERE category_id = $1 ORDER BY title ASC",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(materials)
    }

    async fn search(&self, filter: &MaterialFilter) -> Result<(Vec<MaterialWithCategory>, i64), AppError> {
        // Coluna e direção vêm de enums fechados, nunca do texto do usuário
        let sql = format!(
            r#"
            SELECT m.*, c.title AS category_title
            FROM materials m
            LEFT JOIN categories c ON c.id = m.category_id
            WHERE ($1::text IS NULL OR m.title ILIKE $1 OR m.description ILIKE $1)
            ORDER BY m.{} {}, m.id
            LIMIT $2 OFFSET $3
            "#,
            filter.sort_by.column(),
            filter.sort_order.keyword()
        );

        let items = sqlx::query_as::<_, MaterialWithCategory>(&sql)
            .bind(&filter.pattern)
            .bind(filter.page.limit())
            .bind(filter.page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM materials
            WHERE ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
            "#,
        )
        .bind(&filter.pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((items, total))
    }

    async fn suggestions(&self, prefix_pattern: &str, limit: i64) -> Result<Vec<MaterialSuggestion>, AppError> {
        let suggestions = sqlx::query_as::<_, MaterialSuggestion>(
            r#"
            SELECT id, title AS text FROM materials
            WHERE title ILIKE $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(prefix_pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(suggestions)
    }

    async fn popular(&self, limit: i64) -> Result<Vec<MaterialWithCategory>, AppError> {
        let materials = sqlx::query_as::<_, MaterialWithCategory>(
            r#"
            SELECT m.*, c.title AS category_title
            FROM materials m
            LEFT JOIN categories c ON c.id = m.category_id
            ORDER BY m.views_count DESC, m.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(materials)
    }

    async fn update(&self, id: Uuid, patch: &MaterialPatch) -> Result<Option<Material>, AppError> {
        let material = sqlx::query_as::<_, Material>(
            r#"
            UPDATE materials SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                steps = COALESCE($4, steps),
                category_id = COALESCE($5, category_id),
                image_url = COALESCE($6, image_url),
                video_url = COALESCE($7, video_url),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.steps)
        .bind(patch.category_id)
        .bind(&patch.image_url)
        .bind(&patch.video_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(material)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>, AppError> {
        let views: Option<i64> = sqlx::query_scalar(
            "UPDATE materials SET views_count = views_count + 1 WHERE id = $1 RETURNING views_count",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(views)
    }

    async fn matching_any(&self, patterns: &[String], limit: i64) -> Result<Vec<Material>, AppError> {
        let materials = sqlx::query_as::<_, Material>(
            r#"
            SELECT * FROM materials
            WHERE title ILIKE ANY($1) OR description ILIKE ANY($1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(patterns)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(materials)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM materials")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
