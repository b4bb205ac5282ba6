// src/common/error.rs

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{middleware::i18n::Locale, models::auth::Role};

/// Por que uma ação foi negada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    MissingRole(&'static [Role]),
    NotOwner,
}

/// Entidade que não foi encontrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Product,
    Order,
    Material,
    Category,
    User,
    Conversation,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Sessão ausente")]
    Unauthorized,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Perfil do usuário não encontrado")]
    ProfileNotFound,

    #[error("Acesso negado: {0:?}")]
    Forbidden(Denial),

    #[error("Erro de validação: {0}")]
    ValidationError(String),

    #[error("{0:?} não encontrado")]
    NotFound(Resource),

    #[error("Estoque insuficiente (disponível: {available})")]
    InsufficientStock { available: i32 },

    #[error("Quantidade inválida")]
    InvalidQuantity,

    #[error("Produto aprovado não pode ser editado")]
    CannotEditApproved,

    #[error("Produto não disponível para pedido")]
    ProductNotOrderable,

    #[error("Falha no upload: {0}")]
    UploadFailed(String),

    #[error("Material já salvo")]
    DuplicateSaved,

    #[error("Categoria já existe")]
    CategoryAlreadyExists,

    #[error("Categoria em uso")]
    CategoryInUse,

    #[error("Perfil já existe")]
    ProfileAlreadyExists,

    #[error("Usuário ainda possui produtos ou pedidos")]
    UserInUse,

    #[error("Falha no serviço de IA: {0}")]
    AssistantUnavailable(String),

    #[error("IA não retornou resposta")]
    AssistantNoAnswer,

    // Variante para erros de banco de dados; a mensagem do backend é repassada
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::ProfileNotFound | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ValidationError(_) | AppError::InvalidQuantity => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientStock { .. }
            | AppError::CannotEditApproved
            | AppError::ProductNotOrderable
            | AppError::DuplicateSaved
            | AppError::CategoryAlreadyExists
            | AppError::CategoryInUse
            | AppError::ProfileAlreadyExists
            | AppError::UserInUse => StatusCode::CONFLICT,
            AppError::UploadFailed(_)
            | AppError::AssistantUnavailable(_)
            | AppError::AssistantNoAnswer => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Mensagem legível para o usuário final. Indonésio por padrão.
    pub fn message(&self, locale: &Locale) -> String {
        if locale.is_english() {
            self.message_en()
        } else {
            self.message_id()
        }
    }

    fn message_id(&self) -> String {
        match self {
            AppError::Unauthorized => "Kamu harus login untuk melakukan aksi ini.".into(),
            AppError::InvalidToken => "Token autentikasi tidak valid atau tidak ada.".into(),
            AppError::ProfileNotFound => "Gagal memuat data pengguna untuk otorisasi.".into(),
            AppError::Forbidden(Denial::MissingRole(roles)) => format!(
                "Kamu tidak memiliki izin untuk melakukan aksi ini. Diperlukan peran: {}.",
                join_roles(roles)
            ),
            AppError::Forbidden(Denial::NotOwner) => {
                "Akses ditolak. Kamu bukan pemilik data ini.".into()
            }
            AppError::ValidationError(msg) => msg.clone(),
            AppError::NotFound(resource) => match resource {
                Resource::Product => "Produk tidak ditemukan.".into(),
                Resource::Order => "Pesanan tidak ditemukan.".into(),
                Resource::Material => "Materi tidak ditemukan.".into(),
                Resource::Category => "Kategori tidak ditemukan.".into(),
                Resource::User => "Pengguna tidak ditemukan.".into(),
                Resource::Conversation => "Percakapan tidak ditemukan.".into(),
            },
            AppError::InsufficientStock { available } => {
                format!("Stok tidak mencukupi. Stok tersedia: {}.", available)
            }
            AppError::InvalidQuantity => "Jumlah pesanan harus lebih besar dari 0.".into(),
            AppError::CannotEditApproved => {
                "Produk yang sudah disetujui tidak dapat diubah.".into()
            }
            AppError::ProductNotOrderable => {
                "Produk belum disetujui atau tidak lagi tersedia untuk dipesan.".into()
            }
            AppError::UploadFailed(detail) => format!("Gagal mengunggah berkas: {}", detail),
            AppError::DuplicateSaved => "Materi ini sudah ada di daftar simpanan Anda.".into(),
            AppError::CategoryAlreadyExists => {
                "Nama kategori sudah ada. Silakan gunakan nama lain.".into()
            }
            AppError::CategoryInUse => {
                "Kategori masih digunakan oleh materi atau produk.".into()
            }
            AppError::ProfileAlreadyExists => "Profil pengguna sudah terdaftar.".into(),
            AppError::UserInUse => {
                "Pengguna masih memiliki produk atau pesanan dan tidak dapat dihapus.".into()
            }
            AppError::AssistantUnavailable(_) => "Gagal menghubungi Paman AI.".into(),
            AppError::AssistantNoAnswer => "AI tidak memberikan jawaban.".into(),
            AppError::DatabaseError(e) => format!("Terjadi kesalahan basis data: {}", e),
            AppError::InternalServerError(_) => "Terjadi kesalahan yang tidak diketahui.".into(),
        }
    }

    fn message_en(&self) -> String {
        match self {
            AppError::Unauthorized => "You must be logged in to perform this action.".into(),
            AppError::InvalidToken => "Authentication token is invalid or missing.".into(),
            AppError::ProfileNotFound => "Could not load the user profile for authorization.".into(),
            AppError::Forbidden(Denial::MissingRole(roles)) => format!(
                "You are not allowed to perform this action. Required role: {}.",
                join_roles(roles)
            ),
            AppError::Forbidden(Denial::NotOwner) => {
                "Access denied. You do not own this record.".into()
            }
            // Mensagens de validação vêm dos formulários e ficam no idioma do produto
            AppError::ValidationError(msg) => msg.clone(),
            AppError::NotFound(resource) => match resource {
                Resource::Product => "Product not found.".into(),
                Resource::Order => "Order not found.".into(),
                Resource::Material => "Material not found.".into(),
                Resource::Category => "Category not found.".into(),
                Resource::User => "User not found.".into(),
                Resource::Conversation => "Conversation not found.".into(),
            },
            AppError::InsufficientStock { available } => {
                format!("Insufficient stock. Available stock: {}.", available)
            }
            AppError::InvalidQuantity => "Order quantity must be greater than 0.".into(),
            AppError::CannotEditApproved => "An approved product can no longer be edited.".into(),
            AppError::ProductNotOrderable => {
                "The product is not approved or no longer available for ordering.".into()
            }
            AppError::UploadFailed(detail) => format!("Upload failed: {}", detail),
            AppError::DuplicateSaved => "This material is already in your saved list.".into(),
            AppError::CategoryAlreadyExists => {
                "Category name already exists. Please choose another one.".into()
            }
            AppError::CategoryInUse => "The category is still used by materials or products.".into(),
            AppError::ProfileAlreadyExists => "The user profile is already registered.".into(),
            AppError::UserInUse => {
                "The user still owns products or orders and cannot be deleted.".into()
            }
            AppError::AssistantUnavailable(_) => "Could not reach Paman AI.".into(),
            AppError::AssistantNoAnswer => "The AI did not return an answer.".into(),
            AppError::DatabaseError(e) => format!("A database error occurred: {}", e),
            AppError::InternalServerError(_) => "An unknown error occurred.".into(),
        }
    }

    /// Converte o erro de domínio no envelope de falha, registrando o detalhe antes.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("🔥 {}", self);
        } else {
            tracing::warn!("⚠️ {}", self);
        }
        ApiError {
            status,
            error_message: self.message(locale),
        }
    }
}

fn join_roles(roles: &[Role]) -> String {
    roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
}

// Envelope de falha: { "success": false, "errorMessage": "..." }
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error_message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "errorMessage": self.error_message,
        }));
        (self.status, body).into_response()
    }
}

// Middlewares e extratores não têm acesso ao Locale; usam o idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

// ---
// Rejeições dos extratores do axum viram erros de validação
// ---
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(format!("Data tidak valid: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::ValidationError(format!("Parameter tidak valid: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::ValidationError(format!("Parameter tidak valid: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::ValidationError(format!("Formulir tidak valid: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::ValidationError(format!("Formulir tidak valid: {}", err.body_text()))
    }
}
