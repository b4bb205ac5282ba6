// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::auth::SessionContext};

type BearerHeader = Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>;

fn bearer_token(header: &BearerHeader) -> Result<&str, AppError> {
    match header {
        Ok(TypedHeader(Authorization(bearer))) => Ok(bearer.token()),
        Err(rejection) if rejection.is_missing() => Err(AppError::Unauthorized),
        Err(_) => Err(AppError::InvalidToken),
    }
}

// ---
// Middlewares
// ---

/// Exige sessão: token válido e perfil existente. A sessão vai para os extensions.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    header: BearerHeader,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&header)?;
    let session = app_state.auth_service.resolve_session(token).await?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Igual ao `auth_guard`, mas nunca rejeita: sem sessão a requisição segue anônima.
pub async fn optional_auth(
    State(app_state): State<AppState>,
    header: BearerHeader,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(token) = bearer_token(&header) {
        match app_state.auth_service.resolve_session(token).await {
            Ok(session) => {
                request.extensions_mut().insert(session);
            }
            Err(e) => tracing::debug!("Sessão opcional ignorada: {}", e),
        }
    }
    next.run(request).await
}

// ---
// Extratores
// ---

// Sessão resolvida pelo `auth_guard`
pub struct AuthenticatedUser(pub SessionContext);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .copied()
            .map(AuthenticatedUser)
            .ok_or(AppError::Unauthorized)
    }
}

// Sessão resolvida pelo `optional_auth`, se houver
pub struct MaybeUser(pub Option<SessionContext>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<SessionContext>().copied()))
    }
}

/// `sub` de um token válido, antes de o perfil existir (cadastro do perfil).
pub struct TokenSubject(pub Uuid);

impl FromRequestParts<AppState> for TokenSubject {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = <BearerHeader as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        let token = bearer_token(&header)?;
        state.auth_service.validate_token(token).map(TokenSubject)
    }
}
