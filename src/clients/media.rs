// src/clients/media.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::common::error::AppError;

// Pastas no host de mídia
pub const PRODUCT_IMAGES: &str = "papua_mandiri_produk_images";
pub const MATERIAL_IMAGES: &str = "papua_mandiri_materi_images";
pub const MATERIAL_VIDEOS: &str = "papua_mandiri_materi_videos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    fn resource(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

// Arquivo recebido num formulário multipart
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Envia o arquivo e devolve a URL pública.
    async fn upload(&self, file: MediaUpload, kind: MediaKind, folder: &str) -> Result<String, AppError>;
}

#[derive(Clone)]
pub struct HttpMediaUploader {
    http: reqwest::Client,
    upload_url: Option<String>,
    preset: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl HttpMediaUploader {
    pub fn new(upload_url: Option<String>, preset: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self { http, upload_url, preset })
    }
}

#[async_trait]
impl MediaUploader for HttpMediaUploader {
    async fn upload(&self, file: MediaUpload, kind: MediaKind, folder: &str) -> Result<String, AppError> {
        let base = self
            .upload_url
            .as_deref()
            .ok_or_else(|| AppError::UploadFailed("host de mídia não configurado".into()))?;
        let url = format!("{}/{}/upload", base.trim_end_matches('/'), kind.resource());

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        let mut form = Form::new().part("file", part).text("folder", folder.to_string());
        if let Some(preset) = &self.preset {
            form = form.text("upload_preset", preset.clone());
        }

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UploadFailed(format!("host de mídia respondeu {}", status)));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::UploadFailed(e.to_string()))?;

        tracing::info!("📤 Arquivo enviado para '{}': {}", folder, uploaded.secure_url);
        Ok(uploaded.secure_url)
    }
}
