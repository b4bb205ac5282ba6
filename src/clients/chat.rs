// src/clients/chat.rs

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{common::error::AppError, models::assistant::MessageRole};

pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-0528-qwen3-8b:free";
const APP_TITLE: &str = "Papua Mandiri";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl From<MessageRole> for ChatRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => ChatRole::User,
            MessageRole::Assistant => ChatRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

/// Serviço de chat-completion. `Ok(None)` quando o modelo não devolve texto.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>, AppError>;
}

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub site_url: Option<String>,
}

// Cliente compatível com a API do OpenRouter
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    settings: ChatSettings,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl OpenRouterClient {
    pub fn new(settings: ChatSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { http, settings })
    }
}

#[async_trait]
impl ChatCompletion for OpenRouterClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>, AppError> {
        let url = format!("{}/chat/completions", self.settings.api_base.trim_end_matches('/'));

        let mut request = self
            .http
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .header("X-Title", APP_TITLE)
            .json(&CompletionRequest {
                model: &self.settings.model,
                messages,
            });
        if let Some(site) = &self.settings.site_url {
            request = request.header("HTTP-Referer", site);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::AssistantUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AssistantUnavailable(format!("{}: {}", status, body)));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::AssistantUnavailable(e.to_string()))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty()))
    }
}
