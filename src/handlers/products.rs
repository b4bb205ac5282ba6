// src/handlers/products.rs

use axum::extract::{Path, Query, State};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    common::{
        envelope::Envelope,
        error::{ApiError, AppError},
        pagination::Pagination,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::product::{Product, ProductSearchQuery},
};

const DEFAULT_CATALOG_LIMIT: u32 = 10;

// ---
// Handler: search_products (catálogo público)
// ---
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductSearchQuery),
    responses(
        (status = 200, description = "Envelope com `products` (página de produtos aprovados)", body = Vec<Product>),
        (status = 400, description = "Termo de busca muito curto")
    )
)]
pub async fn search_products(
    State(app_state): State<AppState>,
    locale: Locale,
    WithRejection(Query(query), _): WithRejection<Query<ProductSearchQuery>, AppError>,
) -> Result<Envelope, ApiError> {
    let page = Pagination::new(
        query.page.unwrap_or(1),
        query.limit.unwrap_or(DEFAULT_CATALOG_LIMIT),
    );

    let products = app_state
        .product_service
        .search_products(query.q.as_deref(), page)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("products", products)
        .map_err(|e| e.to_api_error(&locale))
}

// ---
// Handler: get_product
// ---
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Envelope com `product`", body = Product),
        (status = 404, description = "Produto não encontrado ou não aprovado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    WithRejection(Path(product_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Envelope, ApiError> {
    let product = app_state
        .product_service
        .get_product(product_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Envelope::new()
        .with("product", product)
        .map_err(|e| e.to_api_error(&locale))
}
