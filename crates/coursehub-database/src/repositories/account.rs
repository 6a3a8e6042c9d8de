//! Account repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_entity::account::{Account, CreateAccount};

use crate::store::CredentialStore;

/// Repository for account records, session tokens, and recovery tokens.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for AccountRepository {
    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by id", e)
            })
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find account by email", e)
            })
    }

    async fn create_account(&self, data: &CreateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (user_name, email, password_hash, role) \
             VALUES ($1, LOWER($2), $3, $4) \
             RETURNING *",
        )
        .bind(&data.user_name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("accounts_email_key") =>
            {
                AppError::conflict("Email already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create account", e),
        })
    }

    async fn set_session_token(&self, account_id: Uuid, token: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET current_session_token = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(account_id)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to store session token", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {account_id} not found")));
        }
        Ok(())
    }

    async fn clear_session_token(&self, token: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE accounts SET current_session_token = NULL, updated_at = NOW() \
             WHERE current_session_token = $1",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear session token", e)
        })?;
        Ok(())
    }

    async fn set_recovery_token(
        &self,
        account_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET reset_token_hash = $2, reset_token_expires_at = $3, \
                                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(account_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to store recovery token", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {account_id} not found")));
        }
        Ok(())
    }

    async fn take_account_by_recovery_token(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<Account>> {
        // Clearing the hash in the same statement makes the token single-use
        // even under concurrent reset attempts.
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET reset_token_hash = NULL, reset_token_expires_at = NULL, \
                                 updated_at = NOW() \
             WHERE reset_token_hash = $1 AND reset_token_expires_at > NOW() \
             RETURNING *",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to consume recovery token", e)
        })
    }

    async fn update_password(&self, account_id: Uuid, password_hash: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE accounts SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(account_id)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update password", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {account_id} not found")));
        }
        Ok(())
    }

    async fn set_blocked(&self, account_id: Uuid, blocked: bool) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE accounts SET is_blocked = $2, updated_at = NOW() WHERE id = $1")
                .bind(account_id)
                .bind(blocked)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update block flag", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {account_id} not found")));
        }
        Ok(())
    }

    async fn adjust_courses_count(&self, account_id: Uuid, delta: i64) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE accounts SET courses_count = GREATEST(courses_count + $2, 0), \
                                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(account_id)
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to adjust courses_count", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Account {account_id} not found")));
        }
        Ok(())
    }

    async fn list_courses_counts(&self) -> AppResult<Vec<(Uuid, i64)>> {
        sqlx::query_as::<_, (Uuid, i64)>("SELECT id, courses_count FROM accounts")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list courses_counts", e)
            })
    }

    async fn set_courses_count(&self, account_id: Uuid, value: i64) -> AppResult<()> {
        sqlx::query("UPDATE accounts SET courses_count = $2, updated_at = NOW() WHERE id = $1")
            .bind(account_id)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set courses_count", e)
            })?;
        Ok(())
    }
}
