//! Credential lookup over stored accounts.

use async_trait::async_trait;
use tracing::debug;

use super::model::Account;
use super::repository::AccountRepository;
use crate::auth::{verify_secret, SecretHasher};
use crate::db::DbPool;
use crate::{MailGateError, Result};

/// Secret hashed once at startup and verified against when an email is unknown.
const DUMMY_SECRET: &str = "mailgate-dummy-secret";

/// Lookup of an account by credential match.
///
/// Implementations return `Ok(None)` when no account matches both the email
/// and the secret. Errors are reserved for store faults.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find the account whose email and secret both match.
    async fn find_by_credential(&self, email: &str, secret: &str) -> Result<Option<Account>>;
}

/// SQLite-backed account store with Argon2id verification.
pub struct SqliteAccountStore {
    pool: DbPool,
    dummy_hash: String,
}

impl SqliteAccountStore {
    /// Create a store over `pool`. `hasher` only produces the dummy hash used
    /// to equalize timing for unknown emails.
    pub fn new(pool: DbPool, hasher: &SecretHasher) -> Result<Self> {
        let dummy_hash = hasher
            .hash(DUMMY_SECRET)
            .map_err(|e| MailGateError::Hash(e.to_string()))?;
        Ok(Self { pool, dummy_hash })
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn find_by_credential(&self, email: &str, secret: &str) -> Result<Option<Account>> {
        let account = AccountRepository::new(&self.pool).get_by_email(email).await?;

        // Unknown emails still pay for one verification.
        let hash = match &account {
            Some(account) => account.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };
        let secret = secret.to_owned();

        let verified = tokio::task::spawn_blocking(move || verify_secret(&secret, &hash).is_ok())
            .await
            .map_err(|e| MailGateError::Hash(e.to_string()))?;

        if account.is_some() && !verified {
            debug!("Stored secret did not verify");
        }

        Ok(account.filter(|_| verified))
    }
}
