// src/db/conversation_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{AppError, Denial, Resource},
    models::assistant::{Conversation, MessageRole, StoredMessage},
};

/// Uma pergunta e a resposta, gravadas juntas.
#[derive(Debug, Clone)]
pub struct Exchange<'a> {
    pub user_id: Uuid,
    /// `None` cria uma conversa nova com `new_title`
    pub conversation_id: Option<Uuid>,
    pub new_title: &'a str,
    pub question: &'a str,
    pub answer: &'a str,
}

#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Conversation>, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Conversation>, AppError>;

    /// Mensagens da conversa, mais antigas primeiro.
    async fn messages(&self, conversation_id: Uuid) -> Result<Vec<StoredMessage>, AppError>;

    /// Grava a troca numa transação e devolve o id da conversa.
    async fn append_exchange(&self, exchange: Exchange<'_>) -> Result<Uuid, AppError>;
}

#[derive(Clone)]
pub struct ConversationRepository {
    pool: PgPool,
}

impl ConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for ConversationRepository {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Conversation>, AppError> {
        let conversations = sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(conversations)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Conversation>, AppError> {
        let conversation = sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(conversation)
    }

    async fn messages(&self, conversation_id: Uuid) -> Result<Vec<StoredMessage>, AppError> {
        let messages = sqlx::query_as::<_, StoredMessage>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    async fn append_exchange(&self, exchange: Exchange<'_>) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await?;

        let conversation_id = match exchange.conversation_id {
            Some(id) => {
                // Confere o dono dentro da mesma transação
                let owner: Option<Uuid> =
                    sqlx::query_scalar("SELECT user_id FROM conversations WHERE id = $1 FOR UPDATE")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                match owner {
                    Some(owner) if owner == exchange.user_id => id,
                    Some(_) => return Err(AppError::Forbidden(Denial::NotOwner)),
                    None => return Err(AppError::NotFound(Resource::Conversation)),
                }
            }
            None => {
                sqlx::query_scalar::<_, Uuid>(
                    "INSERT INTO conversations (user_id, title) VALUES ($1, $2) RETURNING id",
                )
                .bind(exchange.user_id)
                .bind(exchange.new_title)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        // clock_timestamp() no default garante a ordem pergunta -> resposta
        for (role, content) in [
            (MessageRole::User, exchange.question),
            (MessageRole::Assistant, exchange.answer),
        ] {
            sqlx::query("INSERT INTO messages (conversation_id, role, content) VALUES ($1, $2, $3)")
                .bind(conversation_id)
                .bind(role)
                .bind(content)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(conversation_id)
    }
}
