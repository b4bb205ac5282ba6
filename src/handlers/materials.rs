// src/handlers/materials.rs

use axum::extract::{Multipart, Path, Query, State};
use axum_extra::extract::WithRejection;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{
        envelope::Envelope,
        error::{ApiError, AppError},
        form::FormData,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::material::{
        Material, MaterialForm, MaterialPatch, MaterialSearchQuery, MaterialSuggestion,
        MaterialWithCategory, PopularQuery, SuggestionQuery,
    },
    services::material_service::MaterialMedia,
};

// Documentação do formulário multipart de materi. `steps` pode repetir.
#[derive(ToSchema)]
#[allow(dead_code)]
#[schema(rename_all = "camelCase")]
pub struct MaterialMultipart {
    #[schema(example = "Budidaya Sagu")]
    title: String,
    description: String,
    steps: Vec<String>,
    category_id: Option<Uuid>,
    #[schema(format = Binary)]
    image_file: Option<String>,
    #[schema(format = Binary)]
    video_file: Option<String>,
}

fn take_media(form: &mut FormData) -> MaterialMedia {
    MaterialMedia {
        image: form.take_file("imageFile"),
        video: form.take_file("videoFile"),
    }
}

// ---
// Handler: search_materials
// ---
#[utoipa::path(
    get,
    path = "/api/materials",
    tag = "Materials",
    params(MaterialSearchQuery),
    responses(
        (status = 200, description = "Envelope com `materials` (página)", body = Vec<MaterialWithCategory>)
    )
)]
pub async fn search_materials(
    State(app_state): State<AppState>,
    locale: Locale,
    WithRejection(Query(query), _): WithRejection<Query<MaterialSearchQuery>, AppError>,
) -> Result<Envelope, ApiError> {
    let materials = app_state
        .material_service
        .search_materials(query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("materials", materials)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: list_materials
// ---
#[utoipa::path(
    get,
    path = "/api/materials/all",
    tag = "Materials",
    responses(
        (status = 200, description = "Envelope com todos os `materials`", body = Vec<MaterialWithCategory>)
    )
)]
pub async fn list_materials(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Envelope, ApiError> {
    let materials = app_state
        .material_service
        .list_materials()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("materials", materials)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: popular_materials
// ---
#[utoipa::path(
    get,
    path = "/api/materials/popular",
    tag = "Materials",
    params(PopularQuery),
    responses(
        (status = 200, description = "Envelope com os `materials` mais vistos", body = Vec<MaterialWithCategory>)
    )
)]
pub async fn popular_materials(
    State(app_state): State<AppState>,
    locale: Locale,
    WithRejection(Query(query), _): WithRejection<Query<PopularQuery>, AppError>,
) -> Result<Envelope, ApiError> {
    let materials = app_state
        .material_service
        .popular(query.limit)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("materials", materials)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: material_suggestions
// ---
#[utoipa::path(
    get,
    path = "/api/materials/suggestions",
    tag = "Materials",
    params(SuggestionQuery),
    responses(
        (status = 200, description = "Envelope com `suggestions` por prefixo do título", body = Vec<MaterialSuggestion>)
    )
)]
pub async fn material_suggestions(
    State(app_state): State<AppState>,
    locale: Locale,
    WithRejection(Query(query), _): WithRejection<Query<SuggestionQuery>, AppError>,
) -> Result<Envelope, ApiError> {
    let suggestions = app_state
        .material_service
        .suggestions(query.q.as_deref(), query.limit)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("suggestions", suggestions)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: get_material
// ---
#[utoipa::path(
    get,
    path = "/api/materials/{id}",
    tag = "Materials",
    params(("id" = Uuid, Path, description = "ID do materi")),
    responses(
        (status = 200, description = "Envelope com `material`", body = MaterialWithCategory),
        (status = 404, description = "Materi não encontrado")
    )
)]
pub async fn get_material(
    State(app_state): State<AppState>,
    locale: Locale,
    WithRejection(Path(material_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    let material = app_state
        .material_service
        .get_material(material_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("material", material)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: record_view
// ---
#[utoipa::path(
    post,
    path = "/api/materials/{id}/views",
    tag = "Materials",
    params(("id" = Uuid, Path, description = "ID do materi")),
    responses(
        (status = 200, description = "Envelope com `viewsCount` atualizado"),
        (status = 404, description = "Materi não encontrado")
    )
)]
pub async fn record_view(
    State(app_state): State<AppState>,
    locale: Locale,
    WithRejection(Path(material_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    let views = app_state
        .material_service
        .record_view(material_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("viewsCount", views)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: create_material
// ---
#[utoipa::path(
    post,
    path = "/api/materials",
    tag = "Materials",
    request_body(content = MaterialMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Envelope com `material` criado", body = Material),
        (status = 400, description = "Formulário inválido"),
        (status = 403, description = "Requer super_admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_material(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Envelope, ApiError> {
    let mut form = FormData::from_multipart(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    let media = take_media(&mut form);
    let fields = MaterialForm::from_form(&form).map_err(|e| e.to_api_error(&locale))?;

    let material = app_state
        .material_service
        .create_material(&session, fields, media)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::created()
        .with("material", material)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: update_material
// ---
#[utoipa::path(
    put,
    path = "/api/materials/{id}",
    tag = "Materials",
    params(("id" = Uuid, Path, description = "ID do materi")),
    request_body(content = MaterialMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Envelope com `material` atualizado", body = Material),
        (status = 404, description = "Materi não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_material(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(material_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Envelope, ApiError> {
    let mut form = FormData::from_multipart(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    let media = take_media(&mut form);
    let patch = MaterialPatch::from_form(&form).map_err(|e| e.to_api_error(&locale))?;

    let material = app_state
        .material_service
        .update_material(&session, material_id, patch, media)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("material", material)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: delete_material
// ---
#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    tag = "Materials",
    params(("id" = Uuid, Path, description = "ID do materi")),
    responses(
        (status = 200, description = "Materi removido"),
        (status = 404, description = "Materi não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_material(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(material_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    app_state
        .material_service
        .delete_material(&session, material_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Envelope::new())
}
