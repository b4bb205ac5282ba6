// src/handlers/community.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{
        envelope::Envelope,
        error::{ApiError, AppError},
        form::FormData,
        pagination::PageQuery,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::product::{
        IncomingOrder, Product, ProductForm, ProductOrder, ProductPatch, UpdateOrderStatusPayload,
        UpdateStockPayload,
    },
};

const DEFAULT_PAGE_LIMIT: u32 = 10;

// Documentação do formulário multipart de produto
#[derive(ToSchema)]
#[allow(dead_code)]
#[schema(rename_all = "camelCase")]
pub struct ProductMultipart {
    #[schema(example = "Madu Hutan")]
    title: String,
    description: String,
    #[schema(example = "50000")]
    price: String,
    #[schema(example = "100")]
    stock: String,
    address: String,
    category_id: Option<Uuid>,
    image_url: Option<String>,
    #[schema(format = Binary)]
    image_file: Option<String>,
}

// ---
// Handler: submit_product
// ---
#[utoipa::path(
    post,
    path = "/api/community/products",
    tag = "Community",
    request_body(content = ProductMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Envelope com `product` (status submitted)", body = Product),
        (status = 400, description = "Formulário inválido"),
        (status = 403, description = "Requer admin_komunitas ou super_admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Envelope, ApiError> {
    let mut form = FormData::from_multipart(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    let image = form.take_file("imageFile");
    let fields = ProductForm::from_form(&form).map_err(|e| e.to_api_error(&locale))?;

    let product = app_state
        .product_service
        .submit_product(&session, fields, image)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::created()
        .with("product", product)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: list_my_products
// ---
#[utoipa::path(
    get,
    path = "/api/community/products",
    tag = "Community",
    params(PageQuery),
    responses(
        (status = 200, description = "Envelope com `products` do usuário, com status e nota do governo", body = Vec<Product>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_products(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, AppError>,
) -> Result<Envelope, ApiError> {
    let products = app_state
        .product_service
        .list_my_products(&session, query.resolve(DEFAULT_PAGE_LIMIT))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("products", products)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: edit_product
// ---
#[utoipa::path(
    patch,
    path = "/api/community/products/{id}",
    tag = "Community",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body(content = ProductMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Envelope com `product` reenviado para revisão", body = Product),
        (status = 403, description = "Não é o dono do produto"),
        (status = 409, description = "Produto já aprovado")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(product_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Envelope, ApiError> {
    let mut form = FormData::from_multipart(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    let image = form.take_file("imageFile");
    let patch = ProductPatch::from_form(&form).map_err(|e| e.to_api_error(&locale))?;

    let product = app_state
        .product_service
        .edit_product(&session, product_id, patch, image)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("product", product)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: deactivate_product
// ---
#[utoipa::path(
    delete,
    path = "/api/community/products/{id}",
    tag = "Community",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto desativado"),
        (status = 403, description = "Não é o dono nem super_admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(product_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    app_state
        .product_service
        .deactivate_product(&session, product_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Envelope::new())
}

// ---
// Handler: update_stock
// ---
#[utoipa::path(
    patch,
    path = "/api/community/products/{id}/stock",
    tag = "Community",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = UpdateStockPayload,
    responses(
        (status = 200, description = "Envelope com `product` reabastecido", body = Product),
        (status = 400, description = "Estoque negativo"),
        (status = 403, description = "Não é o dono nem super_admin"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(product_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateStockPayload>, AppError>,
) -> Result<Envelope, ApiError> {
    let product = app_state
        .product_service
        .update_stock(&session, product_id, payload.stock)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("product", product)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: list_incoming_orders
// ---
#[utoipa::path(
    get,
    path = "/api/community/orders",
    tag = "Community",
    responses(
        (status = 200, description = "Envelope com `orders` recebidos, mais novos primeiro", body = Vec<IncomingOrder>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_incoming_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
) -> Result<Envelope, ApiError> {
    let orders = app_state
        .product_service
        .list_incoming_orders(&session)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("orders", orders)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: update_order_status
// ---
#[utoipa::path(
    patch,
    path = "/api/community/orders/{id}",
    tag = "Community",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = UpdateOrderStatusPayload,
    responses(
        (status = 200, description = "Envelope com `order` atualizado", body = ProductOrder),
        (status = 403, description = "Não é o dono do produto do pedido"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Path(order_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateOrderStatusPayload>, AppError>,
) -> Result<Envelope, ApiError> {
    let order = app_state
        .product_service
        .update_order_status(&session, order_id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("order", order)
        .map_err(|e| e.to_api_error(&locale))
}
