// src/models/material.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    error::AppError,
    form::FormData,
    validation::{first_error_message, validate_steps, ValidateForm},
};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Uuid,
    #[schema(example = "Budidaya Sagu")]
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub steps: Vec<String>,
    pub category_id: Option<Uuid>,
    pub uploader_id: Option<Uuid>,
    pub views_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialWithCategory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub material: Material,
    pub category_title: Option<String>,
}

// Item da lista de materiais salvos
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedMaterialEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub material: Material,
    pub category_title: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct MaterialSuggestion {
    pub id: Uuid,
    #[schema(example = "Budidaya Sagu")]
    pub text: String,
}

// ---
// Formulários (multipart)
// ---

#[derive(Debug, Clone, Validate)]
pub struct MaterialForm {
    #[validate(length(min = 3, message = "Judul materi minimal 3 karakter"))]
    pub title: String,

    #[validate(length(min = 10, message = "Deskripsi materi minimal 10 karakter"))]
    pub description: String,

    #[validate(custom(function = "validate_steps"))]
    pub steps: Vec<String>,

    pub category_id: Option<Uuid>,

    // Preenchidos depois do upload
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl ValidateForm for MaterialForm {
    const FIELD_ORDER: &'static [&'static str] = &["title", "description", "steps"];
}

impl MaterialForm {
    pub fn from_form(form: &FormData) -> Result<Self, AppError> {
        Ok(Self {
            title: form.text_or_empty("title").trim().to_string(),
            description: form.text_or_empty("description").trim().to_string(),
            steps: form.all("steps").into_iter().map(|s| s.trim().to_string()).collect(),
            category_id: form.uuid("categoryId", "Kategori tidak valid")?,
            image_url: None,
            video_url: None,
        })
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct MaterialPatch {
    #[validate(length(min = 3, message = "Judul materi minimal 3 karakter"))]
    pub title: Option<String>,

    #[validate(length(min = 10, message = "Deskripsi materi minimal 10 karakter"))]
    pub description: Option<String>,

    pub steps: Option<Vec<String>>,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl ValidateForm for MaterialPatch {
    const FIELD_ORDER: &'static [&'static str] = &["title", "description"];

    fn validate_form(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|errors| AppError::ValidationError(first_error_message(&errors, Self::FIELD_ORDER)))?;
        if let Some(steps) = &self.steps {
            validate_steps(steps).map_err(|e| {
                AppError::ValidationError(
                    e.message.map(|m| m.to_string()).unwrap_or_default(),
                )
            })?;
        }
        Ok(())
    }
}

impl MaterialPatch {
    pub fn from_form(form: &FormData) -> Result<Self, AppError> {
        // Passos em branco são descartados; a lista enviada precisa sobrar com algum passo
        let steps = form.has("steps").then(|| {
            form.all("steps")
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        });

        Ok(Self {
            title: form.non_empty("title").map(|v| v.trim().to_string()),
            description: form.non_empty("description").map(|v| v.trim().to_string()),
            steps,
            category_id: form.uuid("categoryId", "Kategori tidak valid")?,
            image_url: None,
            video_url: None,
        })
    }
}

// ---
// Busca
// ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaterialSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl MaterialSortField {
    pub fn column(&self) -> &'static str {
        match self {
            MaterialSortField::CreatedAt => "created_at",
            MaterialSortField::UpdatedAt => "updated_at",
            MaterialSortField::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSearchQuery {
    pub q: Option<String>,
    pub sort_by: Option<MaterialSortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SuggestionQuery {
    /// Prefixo do título
    pub q: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PopularQuery {
    pub limit: Option<u32>,
}
