// src/handlers/assistant.rs

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
    models::assistant::{AskPayload, Conversation, SendMessagePayload, StoredMessage},
};

// ---
// Handler: ask (sem persistência; o cliente manda o histórico)
// ---
#[utoipa::path(
    post,
    path = "/api/assistant/ask",
    tag = "Assistant",
    request_body = AskPayload,
    responses(
        (status = 200, description = "Envelope com `response` do Paman AI"),
        (status = 400, description = "Pergunta vazia"),
        (status = 502, description = "Falha no provedor de IA")
    ),
    security(("api_jwt" = []))
)]
pub async fn ask(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<AskPayload>, AppError>,
) -> Result<Envelope, ApiError> {
    let answer = app_state
        .assistant_service
        .ask(&session, &payload.question, &payload.history)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("response", answer)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: list_conversations
// ---
#[utoipa::path(
    get,
    path = "/api/assistant/conversations",
    tag = "Assistant",
    responses(
        (status = 200, description = "Envelope com `conversations` do usuário, mais novas primeiro", body = Vec<Conversation>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_conversations(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
) -> Result<Envelope, ApiError> {
    let conversations = app_state
        .assistant_service
        .list_conversations(&session)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("conversations", conversations)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: get_messages
// ---
#[utoipa::path(
    get,
    path = "/api/assistant/conversations/{id}/messages",
    tag = "Assistant",
    params(("id" = Uuid, Path, description = "ID da conversa")),
    responses(
        (status = 200, description = "Envelope com `messages` em ordem cronológica", body = Vec<StoredMessage>),
        (status = 403, description = "Conversa de outro usuário"),
        (status = 404, description = "Conversa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_messages(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(conversation_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    let messages = app_state
        .assistant_service
        .get_messages(&session, conversation_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("messages", messages)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: send_message (pergunta e resposta ficam salvas)
// ---
#[utoipa::path(
    post,
    path = "/api/assistant/conversations/messages",
    tag = "Assistant",
    request_body = SendMessagePayload,
    responses(
        (status = 200, description = "Envelope com `aiMessage` e `conversationId`"),
        (status = 403, description = "Conversa de outro usuário"),
        (status = 502, description = "Falha no provedor de IA")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<SendMessagePayload>, AppError>,
) -> Result<Envelope, ApiError> {
    let saved = app_state
        .assistant_service
        .ask_and_save(&session, payload.conversation_id, &payload.message)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("aiMessage", saved.answer)
        .and_then(|env| env.with("conversationId", saved.conversation_id))
        .map_err(|e| e.to_api_error(&locale))
}
