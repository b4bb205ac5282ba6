pub mod assistant;
pub mod auth;
pub mod category;
pub mod dashboard;
pub mod material;
pub mod product;
