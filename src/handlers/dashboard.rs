// src/handlers/dashboard.rs

use axum::extract::State;

use crate::{
    common::{envelope::Envelope, error::ApiError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::dashboard::Statistics,
};

// GET /api/admin/statistics
#[utoipa::path(
    get,
    path = "/api/admin/statistics",
    tag = "Admin",
    responses(
        (status = 200, description = "Envelope com `statistics`: total de usuários e de materi", body = Statistics),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Requer super_admin")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_statistics(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
) -> Result<Envelope, ApiError> {
    let statistics = app_state
        .dashboard_service
        .statistics(&session)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("statistics", statistics)
        .map_err(|e| e.to_api_error(&locale))
}
