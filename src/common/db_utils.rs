// src/common/db_utils.rs

use crate::common::error::AppError;

// ---
// Helpers de erro do Postgres
// ---

/// Troca uma violação de UNIQUE pelo erro de domínio indicado.
pub(crate) fn on_unique_violation(err: sqlx::Error, domain: AppError) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => domain,
        _ => err.into(),
    }
}

/// Troca uma violação de FOREIGN KEY pelo erro de domínio indicado.
pub(crate) fn on_foreign_key_violation(err: sqlx::Error, domain: AppError) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => domain,
        _ => err.into(),
    }
}

/// Tabelas de ligação: UNIQUE e FOREIGN KEY viram erros de domínio distintos.
pub(crate) fn on_link_violation(err: sqlx::Error, unique: AppError, foreign_key: AppError) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => unique,
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => foreign_key,
        _ => err.into(),
    }
}

// ---
// Helpers de busca
// ---

/// Escapa os metacaracteres do LIKE (`\`, `%`, `_`).
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Padrão `%termo%` para ILIKE.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

/// Padrão `termo%` para ILIKE.
pub fn prefix_pattern(term: &str) -> String {
    format!("{}%", escape_like(term))
}
