// src/common/form.rs

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{clients::media::MediaUpload, common::error::AppError};

/// Conteúdo de um `multipart/form-data`: campos de texto (podem repetir)
/// e arquivos. Arquivos vazios são descartados.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, MediaUpload>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    form.files.insert(
                        name,
                        MediaUpload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
            } else {
                let value = field.text().await?;
                form.fields.entry(name).or_default().push(value);
            }
        }

        Ok(form)
    }

    pub fn insert_text(&mut self, key: &str, value: &str) {
        self.fields.entry(key.to_string()).or_default().push(value.to_string());
    }

    pub fn insert_file(&mut self, key: &str, upload: MediaUpload) {
        self.files.insert(key.to_string(), upload);
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(|values| values.first()).cloned()
    }

    /// Texto obrigatório; ausente vira string vazia para a validação reportar.
    pub fn text_or_empty(&self, key: &str) -> String {
        self.text(key).unwrap_or_default()
    }

    /// Texto opcional: vazio conta como ausente.
    pub fn non_empty(&self, key: &str) -> Option<String> {
        self.text(key).filter(|v| !v.trim().is_empty())
    }

    pub fn all(&self, key: &str) -> Vec<String> {
        self.fields.get(key).cloned().unwrap_or_default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn take_file(&mut self, key: &str) -> Option<MediaUpload> {
        self.files.remove(key)
    }

    pub fn decimal(&self, key: &str, message: &str) -> Result<Option<Decimal>, AppError> {
        self.parse_with(key, message, |raw| Decimal::from_str(raw).ok())
    }

    pub fn integer(&self, key: &str, message: &str) -> Result<Option<i32>, AppError> {
        self.parse_with(key, message, |raw| raw.parse::<i32>().ok())
    }

    pub fn uuid(&self, key: &str, message: &str) -> Result<Option<Uuid>, AppError> {
        self.parse_with(key, message, |raw| Uuid::parse_str(raw).ok())
    }

    fn parse_with<T>(
        &self,
        key: &str,
        message: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, AppError> {
        match self.non_empty(key) {
            None => Ok(None),
            Some(raw) => parse(raw.trim())
                .map(Some)
                .ok_or_else(|| AppError::ValidationError(message.to_string())),
        }
    }
}
