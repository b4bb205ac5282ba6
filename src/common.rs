pub mod db_utils;
pub mod envelope;
pub mod error;
pub mod form;
pub mod pagination;
pub mod validation;
