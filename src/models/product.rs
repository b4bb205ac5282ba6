// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::{
    error::AppError,
    form::FormData,
    validation::{validate_price, ValidateForm},
};

// ---
// Enums (espelham os tipos do banco)
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Submitted,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    InProgress,
    Completed,
    Cancelled,
}

// ---
// Linhas
// ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Madu Hutan")]
    pub title: String,
    pub description: String,
    #[schema(value_type = f64, example = 50000)]
    pub price: Decimal,
    #[schema(example = 100)]
    pub stock: i32,
    pub address: String,
    pub image_url: Option<String>,
    pub status: ProductStatus,
    pub government_note: Option<String>,
    pub category_id: Option<Uuid>,
    pub created_by: Uuid,
    pub reviewed_by: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_orderable(&self) -> bool {
        self.is_active && self.status == ProductStatus::Approved
    }
}

/// Produto com o nome de quem submeteu (fila de revisão e lista de pedidos).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCreator {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub creator_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductOrder {
    pub id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 30)]
    pub quantity: i32,
    pub note: Option<String>,
    pub ordered_by: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Histórico do lado do governo: o pedido com o produto
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: ProductOrder,
    pub product_title: String,
    pub product_image_url: Option<String>,
}

// Pedidos recebidos pela comunidade: o pedido com o produto e quem pediu
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncomingOrder {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: ProductOrder,
    pub product_title: String,
    pub orderer_name: Option<String>,
}

// ---
// Formulários
// ---

fn validate_product_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut err = ValidationError::new("length");
        err.message = Some("Judul produk wajib diisi".into());
        return Err(err);
    }
    if title.chars().count() > 255 {
        let mut err = ValidationError::new("length");
        err.message = Some("Judul terlalu panjang".into());
        return Err(err);
    }
    Ok(())
}

/// Campos de um produto novo, já com a URL da imagem resolvida.
#[derive(Debug, Clone, Validate)]
pub struct ProductForm {
    #[validate(custom(function = "validate_product_title"))]
    pub title: String,

    #[validate(length(min = 1, message = "Deskripsi produk wajib diisi"))]
    pub description: String,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Stok tidak boleh negatif"))]
    pub stock: i32,

    #[validate(length(min = 1, message = "Alamat wajib diisi"))]
    pub address: String,

    pub category_id: Option<Uuid>,

    #[validate(url(message = "URL gambar tidak valid"))]
    pub image_url: Option<String>,
}

impl ValidateForm for ProductForm {
    const FIELD_ORDER: &'static [&'static str] =
        &["title", "description", "price", "stock", "address", "image_url"];
}

impl ProductForm {
    pub fn from_form(form: &FormData) -> Result<Self, AppError> {
        Ok(Self {
            title: form.text_or_empty("title").trim().to_string(),
            description: form.text_or_empty("description").trim().to_string(),
            price: form
                .decimal("price", "Harga harus berupa angka")?
                .unwrap_or(Decimal::ZERO),
            stock: form
                .integer("stock", "Stok harus berupa bilangan bulat")?
                .unwrap_or(0),
            address: form.text_or_empty("address").trim().to_string(),
            category_id: form.uuid("categoryId", "Kategori tidak valid")?,
            image_url: form.non_empty("imageUrl"),
        })
    }
}

/// Edição parcial: só os campos enviados são aplicados.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 255, message = "Judul produk wajib diisi (maksimal 255 karakter)"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Deskripsi produk wajib diisi"))]
    pub description: Option<String>,

    pub price: Option<Decimal>,

    #[validate(range(min = 0, message = "Stok tidak boleh negatif"))]
    pub stock: Option<i32>,

    #[validate(length(min = 1, message = "Alamat wajib diisi"))]
    pub address: Option<String>,

    pub category_id: Option<Uuid>,

    #[validate(url(message = "URL gambar tidak valid"))]
    pub image_url: Option<String>,
}

impl ValidateForm for ProductPatch {
    const FIELD_ORDER: &'static [&'static str] =
        &["title", "description", "stock", "address", "image_url"];

    fn validate_form(&self) -> Result<(), AppError> {
        if let Some(price) = &self.price {
            validate_price(price).map_err(|err| {
                AppError::ValidationError(
                    err.message.map(|m| m.to_string()).unwrap_or_default(),
                )
            })?;
        }
        self.validate().map_err(|errors| {
            AppError::ValidationError(crate::common::validation::first_error_message(
                &errors,
                Self::FIELD_ORDER,
            ))
        })
    }
}

impl ProductPatch {
    pub fn from_form(form: &FormData) -> Result<Self, AppError> {
        Ok(Self {
            title: form.non_empty("title").map(|v| v.trim().to_string()),
            description: form.non_empty("description").map(|v| v.trim().to_string()),
            price: form.decimal("price", "Harga harus berupa angka")?,
            stock: form.integer("stock", "Stok harus berupa bilangan bulat")?,
            address: form.non_empty("address").map(|v| v.trim().to_string()),
            category_id: form.uuid("categoryId", "Kategori tidak valid")?,
            image_url: form.non_empty("imageUrl"),
        })
    }
}

// ---
// Payloads JSON
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl From<ReviewDecision> for ProductStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => ProductStatus::Approved,
            ReviewDecision::Rejected => ProductStatus::Rejected,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub decision: ReviewDecision,
    #[schema(example = "Sesuai standar")]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub product_id: Uuid,
    #[schema(example = 30)]
    pub quantity: i32,
    pub note: Option<String>,
}

// A comunidade só pode concluir ou cancelar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusUpdate {
    Completed,
    Cancelled,
}

impl From<OrderStatusUpdate> for OrderStatus {
    fn from(update: OrderStatusUpdate) -> Self {
        match update {
            OrderStatusUpdate::Completed => OrderStatus::Completed,
            OrderStatusUpdate::Cancelled => OrderStatus::Cancelled,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusPayload {
    pub status: OrderStatusUpdate,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockPayload {
    #[schema(example = 100)]
    pub stock: i32,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchQuery {
    /// Termo buscado no título ou na descrição (mínimo 2 caracteres)
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
