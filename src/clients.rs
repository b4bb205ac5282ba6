pub mod chat;
pub mod media;
