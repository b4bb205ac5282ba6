// src/handlers/saved_materials.rs

use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    common::{
        envelope::Envelope,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{
        auth::{AuthenticatedUser, MaybeUser},
        i18n::Locale,
    },
    models::material::SavedMaterialEntry,
};

// ---
// Handler: list_saved_materials
// ---
#[utoipa::path(
    get,
    path = "/api/saved-materials",
    tag = "Saved Materials",
    responses(
        (status = 200, description = "Envelope com `materials` salvos, mais recentes primeiro", body = Vec<SavedMaterialEntry>),
        (status = 403, description = "Apenas o papel `user` salva materiais")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_saved_materials(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
) -> Result<Envelope, ApiError> {
    let materials = app_state
        .saved_material_service
        .list(&session)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("materials", materials)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: is_material_saved (sessão opcional)
// ---
#[utoipa::path(
    get,
    path = "/api/saved-materials/{materialId}",
    tag = "Saved Materials",
    params(("materialId" = Uuid, Path, description = "ID do materi")),
    responses(
        (status = 200, description = "Envelope com `isSaved`; sempre false sem sessão")
    ),
    security((), ("api_jwt" = []))
)]
pub async fn is_material_saved(
    State(app_state): State<AppState>,
    locale: Locale,
    MaybeUser(session): MaybeUser,
    WithRejection(Path(material_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    let is_saved = app_state
        .saved_material_service
        .is_saved(session.as_ref(), material_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("isSaved", is_saved)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: save_material
// ---
#[utoipa::path(
    post,
    path = "/api/saved-materials/{materialId}",
    tag = "Saved Materials",
    params(("materialId" = Uuid, Path, description = "ID do materi")),
    responses(
        (status = 201, description = "Materi salvo"),
        (status = 404, description = "Materi não encontrado"),
        (status = 409, description = "Materi já está salvo")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_material(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(material_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    app_state
        .saved_material_service
        .save(&session, material_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Envelope::created())
}

// ---
// Handler: remove_saved_material
// ---
#[utoipa::path(
    delete,
    path = "/api/saved-materials/{materialId}",
    tag = "Saved Materials",
    params(("materialId" = Uuid, Path, description = "ID do materi")),
    responses(
        (status = 200, description = "Materi removido dos salvos (idempotente)")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_saved_material(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(material_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    app_state
        .saved_material_service
        .remove(&session, material_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Envelope::new())
}
