// src/services/material_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    clients::media::{MediaKind, MediaUpload, MediaUploader, MATERIAL_IMAGES, MATERIAL_VIDEOS},
    common::{
        db_utils::{contains_pattern, prefix_pattern},
        error::{AppError, Resource},
        pagination::{Paged, Pagination},
        validation::ValidateForm,
    },
    db::{MaterialFilter, MaterialStore},
    models::{
        auth::{SessionContext, SUPER_ADMIN},
        material::{
            Material, MaterialForm, MaterialPatch, MaterialSearchQuery, MaterialSuggestion,
            MaterialWithCategory,
        },
    },
};

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const DEFAULT_SUGGESTION_LIMIT: u32 = 5;
pub const DEFAULT_POPULAR_LIMIT: u32 = 4;

// Arquivos opcionais de um formulário de material
#[derive(Debug, Default)]
pub struct MaterialMedia {
    pub image: Option<MediaUpload>,
    pub video: Option<MediaUpload>,
}

#[derive(Clone)]
pub struct MaterialService {
    materials: Arc<dyn MaterialStore>,
    uploader: Arc<dyn MediaUploader>,
}

impl MaterialService {
    pub fn new(materials: Arc<dyn MaterialStore>, uploader: Arc<dyn MediaUploader>) -> Self {
        Self { materials, uploader }
    }

    /// Envia imagem e vídeo (se houver) e devolve as URLs.
    async fn upload_media(&self, media: MaterialMedia) -> Result<(Option<String>, Option<String>), AppError> {
        let image_url = match media.image {
            Some(file) => Some(self.uploader.upload(file, MediaKind::Image, MATERIAL_IMAGES).await?),
            None => None,
        };
        let video_url = match media.video {
            Some(file) => Some(self.uploader.upload(file, MediaKind::Video, MATERIAL_VIDEOS).await?),
            None => None,
        };
        Ok((image_url, video_url))
    }

    pub async fn create_material(
        &self,
        ctx: &SessionContext,
        mut form: MaterialForm,
        media: MaterialMedia,
    ) -> Result<Material, AppError> {
        let uploader_id = ctx.require(SUPER_ADMIN)?;
        form.validate_form()?;

        let (image_url, video_url) = self.upload_media(media).await?;
        form.image_url = image_url;
        form.video_url = video_url;

        let material = self.materials.insert(uploader_id, &form).await?;
        tracing::info!("📚 Materi {} criado por {}", material.id, uploader_id);
        Ok(material)
    }

    pub async fn update_material(
        &self,
        ctx: &SessionContext,
        material_id: Uuid,
        mut patch: MaterialPatch,
        media: MaterialMedia,
    ) -> Result<Material, AppError> {
        ctx.require(SUPER_ADMIN)?;
        patch.validate_form()?;

        if self.materials.find(material_id).await?.is_none() {
            return Err(AppError::NotFound(Resource::Material));
        }

        let (image_url, video_url) = self.upload_media(media).await?;
        patch.image_url = image_url;
        patch.video_url = video_url;

        self.materials
            .update(material_id, &patch)
            .await?
            .ok_or(AppError::NotFound(Resource::Material))
    }

    pub async fn delete_material(&self, ctx: &SessionContext, material_id: Uuid) -> Result<(), AppError> {
        ctx.require(SUPER_ADMIN)?;
        if !self.materials.delete(material_id).await? {
            return Err(AppError::NotFound(Resource::Material));
        }
        tracing::info!("🗑️ Materi {} removido", material_id);
        Ok(())
    }

    pub async fn get_material(&self, material_id: Uuid) -> Result<MaterialWithCategory, AppError> {
        self.materials
            .find(material_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Material))
    }

    pub async fn list_materials(&self) -> Result<Vec<MaterialWithCategory>, AppError> {
        self.materials.list_all().await
    }

    pub async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Material>, AppError> {
        self.materials.list_by_category(category_id).await
    }

    pub async fn search_materials(&self, query: MaterialSearchQuery) -> Result<Paged<MaterialWithCategory>, AppError> {
        let page = Pagination::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        );
        let filter = MaterialFilter {
            pattern: query
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(contains_pattern),
            sort_by: query.sort_by.unwrap_or_default(),
            sort_order: query.sort_order.unwrap_or_default(),
            page,
        };

        let (items, total) = self.materials.search(&filter).await?;
        Ok(Paged::new(items, total, page))
    }

    pub async fn suggestions(&self, prefix: Option<&str>, limit: Option<u32>) -> Result<Vec<MaterialSuggestion>, AppError> {
        let Some(prefix) = prefix.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(Vec::new());
        };
        let limit = Pagination::new(1, limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT)).limit();
        self.materials.suggestions(&prefix_pattern(prefix), limit).await
    }

    pub async fn popular(&self, limit: Option<u32>) -> Result<Vec<MaterialWithCategory>, AppError> {
        let limit = Pagination::new(1, limit.unwrap_or(DEFAULT_POPULAR_LIMIT)).limit();
        self.materials.popular(limit).await
    }

    /// Conta uma visualização da página de detalhe.
    pub async fn record_view(&self, material_id: Uuid) -> Result<i64, AppError> {
        self.materials
            .increment_views(material_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Material))
    }
}
