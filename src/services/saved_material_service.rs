// src/services/saved_material_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SavedMaterialStore,
    models::{
        auth::{SessionContext, MEMBER},
        material::SavedMaterialEntry,
    },
};

// Favoritos: só o papel `user` salva materiais
#[derive(Clone)]
pub struct SavedMaterialService {
    saved: Arc<dyn SavedMaterialStore>,
}

impl SavedMaterialService {
    pub fn new(saved: Arc<dyn SavedMaterialStore>) -> Self {
        Self { saved }
    }

    pub async fn save(&self, ctx: &SessionContext, material_id: Uuid) -> Result<(), AppError> {
        let user_id = ctx.require(MEMBER)?;
        self.saved.save(user_id, material_id).await
    }

    /// Idempotente: remover algo que não está salvo não é erro.
    pub async fn remove(&self, ctx: &SessionContext, material_id: Uuid) -> Result<(), AppError> {
        let user_id = ctx.require(MEMBER)?;
        self.saved.remove(user_id, material_id).await
    }

    pub async fn list(&self, ctx: &SessionContext) -> Result<Vec<SavedMaterialEntry>, AppError> {
        let user_id = ctx.require(MEMBER)?;
        self.saved.list(user_id).await
    }

    pub async fn is_saved(&self, ctx: Option<&SessionContext>, material_id: Uuid) -> Result<bool, AppError> {
        match ctx {
            Some(ctx) => self.saved.exists(ctx.user_id, material_id).await,
            None => Ok(false),
        }
    }
}
