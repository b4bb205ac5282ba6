// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    clients::{
        chat::{ChatCompletion, ChatSettings, OpenRouterClient, DEFAULT_API_BASE, DEFAULT_MODEL},
        media::{HttpMediaUploader, MediaUploader},
    },
    db::{
        CategoryRepository, CategoryStore, ConversationRepository, ConversationStore,
        MaterialRepository, MaterialStore, ProductRepository, ProductStore,
        SavedMaterialRepository, SavedMaterialStore, UserRepository, UserStore,
    },
    services::{
        AssistantService, AuthService, CategoryService, DashboardService, MaterialService,
        ProductService, SavedMaterialService, UserService,
    },
};

// ---
// Configuração lida do ambiente (.env opcional)
// ---
#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub chat: ChatSettings,
    pub media_upload_url: Option<String>,
    pub media_upload_preset: Option<String>,
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{} deve ser definida", key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let db_max_connections = match optional("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {}", raw))?,
            None => 5,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_audience: optional("JWT_AUDIENCE"),
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections,
            chat: ChatSettings {
                api_base: optional("AI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                api_key: required("AI_API_KEY")?,
                model: optional("AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                site_url: optional("SITE_URL"),
            },
            media_upload_url: optional("MEDIA_UPLOAD_URL"),
            media_upload_preset: optional("MEDIA_UPLOAD_PRESET"),
        })
    }

    pub async fn connect_pool(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

/// As implementações de persistência usadas pelos serviços.
#[derive(Clone)]
pub struct Stores {
    pub products: Arc<dyn ProductStore>,
    pub materials: Arc<dyn MaterialStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub users: Arc<dyn UserStore>,
    pub saved_materials: Arc<dyn SavedMaterialStore>,
    pub conversations: Arc<dyn ConversationStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            products: Arc::new(ProductRepository::new(pool.clone())),
            materials: Arc::new(MaterialRepository::new(pool.clone())),
            categories: Arc::new(CategoryRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            saved_materials: Arc::new(SavedMaterialRepository::new(pool.clone())),
            conversations: Arc::new(ConversationRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub material_service: MaterialService,
    pub category_service: CategoryService,
    pub user_service: UserService,
    pub dashboard_service: DashboardService,
    pub saved_material_service: SavedMaterialService,
    pub assistant_service: AssistantService,
}

impl AppState {
    /// Monta o gráfico de dependências a partir de qualquer conjunto de stores.
    pub fn build(
        stores: Stores,
        chat: Arc<dyn ChatCompletion>,
        uploader: Arc<dyn MediaUploader>,
        jwt_secret: &str,
        jwt_audience: Option<&str>,
    ) -> Self {
        Self {
            auth_service: AuthService::new(stores.users.clone(), jwt_secret, jwt_audience),
            product_service: ProductService::new(stores.products.clone(), uploader.clone()),
            material_service: MaterialService::new(stores.materials.clone(), uploader),
            category_service: CategoryService::new(stores.categories.clone()),
            user_service: UserService::new(stores.users.clone()),
            dashboard_service: DashboardService::new(stores.users, stores.materials.clone()),
            saved_material_service: SavedMaterialService::new(stores.saved_materials),
            assistant_service: AssistantService::new(stores.materials, stores.conversations, chat),
        }
    }

    /// Estado de produção: Postgres, OpenRouter e o host de mídia.
    pub fn new(settings: &Settings, pool: PgPool) -> anyhow::Result<Self> {
        let chat = OpenRouterClient::new(settings.chat.clone())?;
        let uploader = HttpMediaUploader::new(
            settings.media_upload_url.clone(),
            settings.media_upload_preset.clone(),
        )?;

        Ok(Self::build(
            Stores::postgres(pool),
            Arc::new(chat),
            Arc::new(uploader),
            &settings.jwt_secret,
            settings.jwt_audience.as_deref(),
        ))
    }
}
