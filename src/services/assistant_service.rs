// src/services/assistant_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    clients::chat::{ChatCompletion, ChatMessage, ChatRole},
    common::{
        db_utils::contains_pattern,
        error::{AppError, Denial, Resource},
    },
    db::{ConversationStore, Exchange, MaterialStore},
    models::{
        assistant::{Conversation, HistoryTurn, SavedAnswer, StoredMessage},
        auth::{SessionContext, ANY_ROLE},
        material::Material,
    },
    services::formatter::format_ai_response,
};

/// Máximo de materiais usados como contexto numa resposta.
pub const CONTEXT_LIMIT: i64 = 50;
const TITLE_CHARS: usize = 50;

pub const NO_CONTEXT: &str =
    "Tidak ada konteks yang ditemukan mengenai topik ini di dalam database.";

const SYSTEM_PROMPT: &str = "Anda adalah \"Paman AI\", asisten pintar dari situs Papua Mandiri. \
Tugas Anda adalah membantu masyarakat Papua belajar keterampilan praktis dan mengembangkan usaha \
mandiri. Jawablah dalam Bahasa Indonesia yang ramah, jelas, dan mudah dipahami. Utamakan informasi \
dari konteks materi yang diberikan. Jika konteks tidak memuat jawabannya, katakan dengan jujur dan \
berikan saran umum yang aman. Gunakan format markdown sederhana: judul ###, teks tebal, dan daftar \
bernomor untuk langkah-langkah.";

// ---
// Montagem do prompt
// ---

/// Palavras da pergunta em minúsculas, sem repetição, na ordem em que aparecem.
pub fn extract_keywords(question: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for word in question.to_lowercase().split_whitespace() {
        if !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
    }
    keywords
}

fn format_material(material: &Material) -> String {
    let steps = material
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "### {}\n\n**Deskripsi:**\n{}\n\n**Langkah-langkah:**\n{}",
        material.title, material.description, steps
    )
}

pub fn format_context(materials: &[Material]) -> String {
    if materials.is_empty() {
        return NO_CONTEXT.to_string();
    }
    materials
        .iter()
        .map(format_material)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Prompt de sistema, histórico e a pergunta com o contexto.
pub fn build_messages(history: &[HistoryTurn], context: &str, question: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::new(ChatRole::System, SYSTEM_PROMPT));
    messages.extend(
        history
            .iter()
            .map(|turn| ChatMessage::new(turn.role.into(), turn.content.clone())),
    );
    messages.push(ChatMessage::new(
        ChatRole::User,
        format!(
            "Konteks materi:\n\n{}\n\n---\n\nJawab pertanyaan berikut: \"{}\"",
            context, question
        ),
    ));
    messages
}

/// Título da conversa: os primeiros 50 caracteres da mensagem, seguidos de "...".
pub fn conversation_title(message: &str) -> String {
    let head: String = message.chars().take(TITLE_CHARS).collect();
    format!("{}...", head)
}

// ---
// Serviço
// ---

#[derive(Clone)]
pub struct AssistantService {
    materials: Arc<dyn MaterialStore>,
    conversations: Arc<dyn ConversationStore>,
    chat: Arc<dyn ChatCompletion>,
}

impl AssistantService {
    pub fn new(
        materials: Arc<dyn MaterialStore>,
        conversations: Arc<dyn ConversationStore>,
        chat: Arc<dyn ChatCompletion>,
    ) -> Self {
        Self { materials, conversations, chat }
    }

    async fn answer(&self, question: &str, history: &[HistoryTurn]) -> Result<String, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::ValidationError("Pertanyaan tidak boleh kosong.".to_string()));
        }

        // 1. Contexto: materiais que citam qualquer palavra da pergunta
        let patterns: Vec<String> = extract_keywords(question)
            .iter()
            .map(|k| contains_pattern(k))
            .collect();
        let materials = self.materials.matching_any(&patterns, CONTEXT_LIMIT).await?;
        tracing::debug!("🔎 {} materi(s) encontrados como contexto", materials.len());

        // 2. Prompt e chamada ao modelo
        let messages = build_messages(history, &format_context(&materials), question);
        let raw = self
            .chat
            .complete(&messages)
            .await?
            .ok_or(AppError::AssistantNoAnswer)?;

        Ok(format_ai_response(&raw))
    }

    pub async fn ask(
        &self,
        ctx: &SessionContext,
        question: &str,
        history: &[HistoryTurn],
    ) -> Result<String, AppError> {
        ctx.require(ANY_ROLE)?;
        self.answer(question, history).await
    }

    pub async fn list_conversations(&self, ctx: &SessionContext) -> Result<Vec<Conversation>, AppError> {
        let user_id = ctx.require(ANY_ROLE)?;
        self.conversations.list_for_user(user_id).await
    }

    async fn owned_conversation(&self, user_id: Uuid, conversation_id: Uuid) -> Result<Conversation, AppError> {
        let conversation = self
            .conversations
            .find(conversation_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Conversation))?;
        if conversation.user_id != user_id {
            return Err(AppError::Forbidden(Denial::NotOwner));
        }
        Ok(conversation)
    }

    pub async fn get_messages(
        &self,
        ctx: &SessionContext,
        conversation_id: Uuid,
    ) -> Result<Vec<StoredMessage>, AppError> {
        let user_id = ctx.require(ANY_ROLE)?;
        self.owned_conversation(user_id, conversation_id).await?;
        self.conversations.messages(conversation_id).await
    }

    /// Responde usando o histórico salvo e grava pergunta e resposta juntas.
    pub async fn ask_and_save(
        &self,
        ctx: &SessionContext,
        conversation_id: Option<Uuid>,
        message: &str,
    ) -> Result<SavedAnswer, AppError> {
        let user_id = ctx.require(ANY_ROLE)?;

        let history: Vec<HistoryTurn> = match conversation_id {
            Some(id) => {
                self.owned_conversation(user_id, id).await?;
                self.conversations
                    .messages(id)
                    .await?
                    .iter()
                    .map(HistoryTurn::from)
                    .collect()
            }
            None => Vec::new(),
        };

        let answer = self.answer(message, &history).await?;
        let question = message.trim();
        let title = conversation_title(question);

        let conversation_id = self
            .conversations
            .append_exchange(Exchange {
                user_id,
                conversation_id,
                new_title: &title,
                question,
                answer: &answer,
            })
            .await?;

        tracing::info!("💬 Resposta salva na conversa {}", conversation_id);
        Ok(SavedAnswer { answer, conversation_id })
    }
}
