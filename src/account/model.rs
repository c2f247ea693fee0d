//! Email account model.

use chrono::{DateTime, Utc};

/// An email-provider account, the scoping unit for every message query.
#[derive(Clone, sqlx::FromRow)]
pub struct Account {
    /// Account ID.
    pub id: i64,
    /// ID of the user owning this account.
    pub user_id: i64,
    /// Email address (unique).
    pub email: String,
    /// Argon2id PHC hash of the account secret.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Provider tag (e.g. "gmail", "outlook", "custom").
    pub provider: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// New account for creation.
#[derive(Clone)]
pub struct NewAccount {
    /// ID of the owning user.
    pub user_id: i64,
    /// Email address.
    pub email: String,
    /// Plaintext secret; hashed before it is stored.
    pub secret: String,
    /// Display name.
    pub name: String,
    /// Provider tag.
    pub provider: String,
}

impl NewAccount {
    /// Create a new account with the "custom" provider tag.
    pub fn new(
        user_id: i64,
        email: impl Into<String>,
        secret: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            secret: secret.into(),
            name: name.into(),
            provider: "custom".to_string(),
        }
    }

    /// Set the provider tag.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }
}
