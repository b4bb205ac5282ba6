// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::{auth_guard, optional_auth},
};

/// Monta o router completo. Rotas públicas, com sessão opcional e protegidas
/// ficam em routers separados e são mescladas no final.
pub fn build_router(app_state: AppState) -> Router {
    // Sem sessão
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/categories", get(handlers::categories::list_categories))
        .route(
            "/api/categories/{id}/materials",
            get(handlers::categories::list_materials_by_category),
        )
        .route("/api/materials", get(handlers::materials::search_materials))
        .route("/api/materials/all", get(handlers::materials::list_materials))
        .route("/api/materials/popular", get(handlers::materials::popular_materials))
        .route(
            "/api/materials/suggestions",
            get(handlers::materials::material_suggestions),
        )
        .route("/api/materials/{id}", get(handlers::materials::get_material))
        .route("/api/materials/{id}/views", post(handlers::materials::record_view))
        .route("/api/products", get(handlers::products::search_products))
        .route("/api/products/{id}", get(handlers::products::get_product))
        // Só exige um token válido; o perfil ainda não existe
        .route("/api/users/profile", post(handlers::users::register_profile));

    // Sessão opcional
    let optional_routes = Router::new()
        .route(
            "/api/saved-materials/{materialId}",
            get(handlers::saved_materials::is_material_saved),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            optional_auth,
        ));

    let admin_routes = Router::new()
        .route("/api/categories", post(handlers::categories::create_category))
        .route(
            "/api/categories/{id}",
            put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .route("/api/materials", post(handlers::materials::create_material))
        .route(
            "/api/materials/{id}",
            put(handlers::materials::update_material)
                .delete(handlers::materials::delete_material),
        )
        .route("/api/admin/users", get(handlers::users::search_users))
        .route("/api/admin/users/{id}", axum::routing::delete(handlers::users::delete_user))
        .route("/api/admin/statistics", get(handlers::dashboard::get_statistics));

    let community_routes = Router::new()
        .route(
            "/api/community/products",
            post(handlers::community::submit_product)
                .get(handlers::community::list_my_products),
        )
        .route(
            "/api/community/products/{id}",
            patch(handlers::community::edit_product)
                .delete(handlers::community::deactivate_product),
        )
        .route(
            "/api/community/products/{id}/stock",
            patch(handlers::community::update_stock),
        )
        .route("/api/community/orders", get(handlers::community::list_incoming_orders))
        .route(
            "/api/community/orders/{id}",
            patch(handlers::community::update_order_status),
        );

    let government_routes = Router::new()
        .route(
            "/api/government/products/submitted",
            get(handlers::government::list_submitted_products),
        )
        .route(
            "/api/government/products/{id}/review",
            patch(handlers::government::review_product),
        )
        .route(
            "/api/government/products/approved",
            get(handlers::government::list_approved_products),
        )
        .route(
            "/api/government/orders",
            post(handlers::government::create_order)
                .get(handlers::government::list_order_history),
        );

    let member_routes = Router::new()
        .route("/api/users/me", get(handlers::users::me))
        .route(
            "/api/saved-materials",
            get(handlers::saved_materials::list_saved_materials),
        )
        .route(
            "/api/saved-materials/{materialId}",
            post(handlers::saved_materials::save_material)
                .delete(handlers::saved_materials::remove_saved_material),
        )
        .route("/api/assistant/ask", post(handlers::assistant::ask))
        .route(
            "/api/assistant/conversations",
            get(handlers::assistant::list_conversations),
        )
        .route(
            "/api/assistant/conversations/{id}/messages",
            get(handlers::assistant::get_messages),
        )
        .route(
            "/api/assistant/conversations/messages",
            post(handlers::assistant::send_message),
        );

    // Papéis são checados nos serviços; aqui só se exige a sessão
    let protected_routes = Router::new()
        .merge(admin_routes)
        .merge(community_routes)
        .merge(government_routes)
        .merge(member_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(public_routes)
        .merge(optional_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
