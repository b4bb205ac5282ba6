// src/handlers/users.rs

use axum::{
    extract::{Path, Query, State},
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
    middleware::{
        auth::{AuthenticatedUser, TokenSubject},
        i18n::Locale,
    },
    models::auth::{RegisterProfilePayload, User, UserSearchQuery},
};

// ---
// Handler: register_profile
// ---
#[utoipa::path(
    post,
    path = "/api/users/profile",
    tag = "Users",
    request_body = RegisterProfilePayload,
    responses(
        (status = 201, description = "Envelope com `user` criado com papel `user`", body = User),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Perfil já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    TokenSubject(subject): TokenSubject,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterProfilePayload>, AppError>,
) -> Result<Envelope, ApiError> {
    let user = app_state
        .user_service
        .register_profile(subject, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::created()
        .with("user", user)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: me
// ---
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Envelope com o `user` da sessão", body = User),
        (status = 401, description = "Sem sessão")
    ),
    security(("api_jwt" = []))
)]
pub async fn me(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
) -> Result<Envelope, ApiError> {
    let user = app_state
        .user_service
        .me(&session)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("user", user)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: search_users (super admin)
// ---
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Envelope com `users` (página)", body = Vec<User>),
        (status = 403, description = "Requer super_admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn search_users(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<UserSearchQuery>, AppError>,
) -> Result<Envelope, ApiError> {
    let users = app_state
        .user_service
        .search_users(&session, query)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("users", users)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: delete_user (super admin)
// ---
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário removido"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "Usuário ainda possui produtos ou pedidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    app_state
        .user_service
        .delete_user(&session, user_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Envelope::new())
}
