pub mod assistant_service;
pub mod auth;
pub mod category_service;
pub mod dashboard_service;
pub mod formatter;
pub mod material_service;
pub mod product_service;
pub mod saved_material_service;
pub mod user_service;

pub use assistant_service::AssistantService;
pub use auth::AuthService;
pub use category_service::CategoryService;
pub use dashboard_service::DashboardService;
pub use material_service::MaterialService;
pub use product_service::ProductService;
pub use saved_material_service::SavedMaterialService;
pub use user_service::UserService;
