// src/handlers/government.rs

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
    models::product::{
        CreateOrderPayload, OrderHistoryEntry, Product, ProductOrder, ProductWithCreator,
        ReviewPayload,
    },
};

// ---
// Handler: list_submitted_products
// ---
#[utoipa::path(
    get,
    path = "/api/government/products/submitted",
    tag = "Government",
    responses(
        (status = 200, description = "Envelope com `products` aguardando revisão", body = Vec<ProductWithCreator>),
        (status = 403, description = "Requer admin_pemerintah")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_submitted_products(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
) -> Result<Envelope, ApiError> {
    let products = app_state
        .product_service
        .list_submitted_products(&session)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("products", products)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: review_product
// ---
#[utoipa::path(
    patch,
    path = "/api/government/products/{id}/review",
    tag = "Government",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = ReviewPayload,
    responses(
        (status = 200, description = "Envelope com `product` revisado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn review_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(product_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<ReviewPayload>, AppError>,
) -> Result<Envelope, ApiError> {
    let product = app_state
        .product_service
        .review_product(&session, product_id, payload.decision, payload.note)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("product", product)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: list_approved_products
// ---
#[utoipa::path(
    get,
    path = "/api/government/products/approved",
    tag = "Government",
    responses(
        (status = 200, description = "Envelope com `products` aprovados e com estoque", body = Vec<ProductWithCreator>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_approved_products(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
) -> Result<Envelope, ApiError> {
    let products = app_state
        .product_service
        .list_approved_products(&session)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("products", products)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: create_order
// ---
#[utoipa::path(
    post,
    path = "/api/government/orders",
    tag = "Government",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Envelope com `order` criado; o estoque já foi baixado", body = ProductOrder),
        (status = 400, description = "Quantidade inválida"),
        (status = 409, description = "Estoque insuficiente ou produto indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateOrderPayload>, AppError>,
) -> Result<Envelope, ApiError> {
    let order = app_state
        .product_service
        .create_order(&session, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::created()
        .with("order", order)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: list_order_history
// ---
#[utoipa::path(
    get,
    path = "/api/government/orders",
    tag = "Government",
    responses(
        (status = 200, description = "Envelope com `orders` feitos pelo usuário", body = Vec<OrderHistoryEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_order_history(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
) -> Result<Envelope, ApiError> {
    let orders = app_state
        .product_service
        .list_order_history(&session)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("orders", orders)
        .map_err(|e| e.to_api_error(&locale))
}
