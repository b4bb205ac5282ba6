pub mod category_repo;
pub use category_repo::{CategoryRepository, CategoryStore};
pub mod conversation_repo;
pub use conversation_repo::{ConversationRepository, ConversationStore, Exchange};
pub mod material_repo;
pub use material_repo::{MaterialFilter, MaterialRepository, MaterialStore};
pub mod product_repo;
pub use product_repo::{ProductRepository, ProductStore};
pub mod saved_material_repo;
pub use saved_material_repo::{SavedMaterialRepository, SavedMaterialStore};
pub mod user_repo;
pub use user_repo::{UserRepository, UserStore};
