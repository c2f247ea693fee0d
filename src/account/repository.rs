//! Account repository for mailgate.
//!
//! Account management itself happens elsewhere; this repository covers the
//! reads the credential gate needs plus creation for seeding.

use chrono::Utc;

use super::model::{Account, NewAccount};
use crate::auth::SecretHasher;
use crate::db::DbPool;
use crate::{MailGateError, Result};

/// Repository for account operations.
pub struct AccountRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new AccountRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new account, hashing its secret with `hasher`.
    pub async fn create(&self, new_account: &NewAccount, hasher: &SecretHasher) -> Result<Account> {
        let password_hash = hasher
            .hash(&new_account.secret)
            .map_err(|e| MailGateError::Hash(e.to_string()))?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO email_accounts (user_id, email, password_hash, name, provider, created_at)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(new_account.user_id)
        .bind(&new_account.email)
        .bind(&password_hash)
        .bind(&new_account.name)
        .bind(&new_account.provider)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| MailGateError::NotFound("account".to_string()))
    }

    /// Get an account by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, user_id, email, password_hash, name, provider, created_at
             FROM email_accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(account)
    }

    /// Get an account by exact email address.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, user_id, email, password_hash, name, provider, created_at
             FROM email_accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(account)
    }
}
