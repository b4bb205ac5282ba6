pub mod assistant;
pub mod categories;
pub mod community;
pub mod dashboard;
pub mod government;
pub mod materials;
pub mod products;
pub mod saved_materials;
pub mod users;
