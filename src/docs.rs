// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Papua Mandiri API", description = "Materi, produtos comunitários e Paman AI"),
    paths(
        // --- Categories ---
        handlers::categories::list_categories,
        handlers::categories::list_materials_by_category,
        handlers::categories::create_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,

        // --- Materials ---
        handlers::materials::search_materials,
        handlers::materials::list_materials,
        handlers::materials::popular_materials,
        handlers::materials::material_suggestions,
        handlers::materials::get_material,
        handlers::materials::record_view,
        handlers::materials::create_material,
        handlers::materials::update_material,
        handlers::materials::delete_material,

        // --- Products (catálogo) ---
        handlers::products::search_products,
        handlers::products::get_product,

        // --- Community ---
        handlers::community::submit_product,
        handlers::community::list_my_products,
        handlers::community::edit_product,
        handlers::community::deactivate_product,
        handlers::community::update_stock,
        handlers::community::list_incoming_orders,
        handlers::community::update_order_status,

        // --- Government ---
        handlers::government::list_submitted_products,
        handlers::government::review_product,
        handlers::government::list_approved_products,
        handlers::government::create_order,
        handlers::government::list_order_history,

        // --- Users / Admin ---
        handlers::users::register_profile,
        handlers::users::me,
        handlers::users::search_users,
        handlers::users::delete_user,
        handlers::dashboard::get_statistics,

        // --- Saved Materials ---
        handlers::saved_materials::list_saved_materials,
        handlers::saved_materials::is_material_saved,
        handlers::saved_materials::save_material,
        handlers::saved_materials::remove_saved_material,

        // --- Assistant ---
        handlers::assistant::ask,
        handlers::assistant::list_conversations,
        handlers::assistant::get_messages,
        handlers::assistant::send_message,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterProfilePayload,
            models::auth::UserSearchAttribute,

            // --- Categories ---
            models::category::Category,
            models::category::CategoryPayload,

            // --- Materials ---
            models::material::Material,
            models::material::MaterialWithCategory,
            models::material::SavedMaterialEntry,
            models::material::MaterialSuggestion,
            models::material::MaterialSortField,
            models::material::SortOrder,
            handlers::materials::MaterialMultipart,

            // --- Products ---
            models::product::ProductStatus,
            models::product::OrderStatus,
            models::product::Product,
            models::product::ProductWithCreator,
            models::product::ProductOrder,
            models::product::OrderHistoryEntry,
            models::product::IncomingOrder,
            models::product::ReviewDecision,
            models::product::ReviewPayload,
            models::product::CreateOrderPayload,
            models::product::OrderStatusUpdate,
            models::product::UpdateOrderStatusPayload,
            models::product::UpdateStockPayload,
            handlers::community::ProductMultipart,

            // --- Dashboard ---
            models::dashboard::Statistics,

            // --- Assistant ---
            models::assistant::MessageRole,
            models::assistant::HistoryTurn,
            models::assistant::AskPayload,
            models::assistant::SendMessagePayload,
            models::assistant::Conversation,
            models::assistant::StoredMessage,
        )
    ),
    tags(
        (name = "Categories", description = "Kategori de materi"),
        (name = "Materials", description = "Materi educativos: busca, detalhe e gestão"),
        (name = "Products", description = "Catálogo público de produtos aprovados"),
        (name = "Community", description = "Produtos e pedidos do lado da comunidade"),
        (name = "Government", description = "Revisão de produtos e pedidos do governo"),
        (name = "Users", description = "Perfil do usuário"),
        (name = "Admin", description = "Gestão de usuários e estatísticas"),
        (name = "Saved Materials", description = "Materi salvos pelo usuário"),
        (name = "Assistant", description = "Paman AI")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
