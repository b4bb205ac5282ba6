// src/models/category.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::validation::ValidateForm;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Pertanian")]
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn validate_category_title(title: &str) -> Result<(), ValidationError> {
    let len = title.trim().chars().count();
    let message = if len < 2 {
        "Nama kategori minimal 2 karakter"
    } else if len > 50 {
        "Nama kategori maksimal 50 karakter"
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("length");
    err.message = Some(message.into());
    Err(err)
}

// Usado tanto na criação quanto na atualização
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(custom(function = "validate_category_title"))]
    #[schema(example = "Pertanian")]
    pub title: String,

    #[validate(length(max = 255, message = "Deskripsi maksimal 255 karakter"))]
    pub description: Option<String>,
}

impl ValidateForm for CategoryPayload {
    const FIELD_ORDER: &'static [&'static str] = &["title", "description"];
}

impl CategoryPayload {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }
}
