// src/handlers/categories.rs

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    common::{
        envelope::Envelope,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        category::{Category, CategoryPayload},
        material::Material,
    },
};

// ---
// Handler: list_categories (público)
// ---
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    responses(
        (status = 200, description = "Envelope com `categories` em ordem alfabética", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Envelope, ApiError> {
    let categories = app_state
        .category_service
        .list_categories()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("categories", categories)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: list_materials_by_category (público)
// ---
#[utoipa::path(
    get,
    path = "/api/categories/{id}/materials",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Envelope com `materials` da categoria", body = Vec<Material>)
    )
)]
pub async fn list_materials_by_category(
    State(app_state): State<AppState>,
    locale: Locale,
    WithRejection(Path(category_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    let materials = app_state
        .material_service
        .list_by_category(category_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("materials", materials)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: create_category
// ---
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    request_body = CategoryPayload,
    responses(
        (status = 201, description = "Envelope com `category` criada", body = Category),
        (status = 409, description = "Nome de categoria já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryPayload>, AppError>,
) -> Result<Envelope, ApiError> {
    let category = app_state
        .category_service
        .create_category(&session, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::created()
        .with("category", category)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: update_category
// ---
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Envelope com `category` atualizada", body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(category_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryPayload>, AppError>,
) -> Result<Envelope, ApiError> {
    let category = app_state
        .category_service
        .update_category(&session, category_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("category", category)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: delete_category
// ---
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria removida"),
        (status = 409, description = "Categoria ainda em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(category_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    app_state
        .category_service
        .delete_category(&session, category_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Envelope::new())
}
