// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::on_foreign_key_violation,
        error::AppError,
        pagination::Pagination,
    },
    models::auth::{RegisterProfilePayload, User, UserSearchAttribute},
};

// Todas as interações com a tabela 'users'
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Cria o perfil com o papel padrão `user`.
    async fn create_profile(&self, id: Uuid, payload: &RegisterProfilePayload) -> Result<User, AppError>;

    /// `pattern` já vem pronto para ILIKE.
    async fn search(
        &self,
        attribute: UserSearchAttribute,
        pattern: Option<&str>,
        page: Pagination,
    ) -> Result<(Vec<User>, i64), AppError>;

    /// Falha com `UserInUse` se o usuário ainda tiver produtos ou pedidos.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    async fn create_profile(&self, id: Uuid, payload: &RegisterProfilePayload) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, user_name, user_email, location)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.full_name.trim())
        .bind(payload.email.trim())
        .bind(&payload.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return match db_err.constraint() {
                        // O nome padrão que o Postgres cria para UNIQUE na coluna do email
                        Some("users_user_email_key") => {
                            AppError::ValidationError("Email sudah digunakan oleh akun lain".into())
                        }
                        _ => AppError::ProfileAlreadyExists,
                    };
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    async fn search(
        &self,
        attribute: UserSearchAttribute,
        pattern: Option<&str>,
        page: Pagination,
    ) -> Result<(Vec<User>, i64), AppError> {
        let column = attribute.column();

        let sql = format!(
            r#"
            SELECT * FROM users
            WHERE ($1::text IS NULL OR {column} ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(pattern)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR {column} ILIKE $1)");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok((users, total))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_foreign_key_violation(e, AppError::UserInUse))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
