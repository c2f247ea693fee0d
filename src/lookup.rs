//! Credential-gated email lookup.
//!
//! [`MailLookupService`] is the single entry point behind the public
//! endpoints. Every operation authenticates first, then normalizes the
//! request, optionally triggers a sync, and finally reads through the
//! email query service.

use std::sync::Arc;

use tracing::{error, info};

use crate::account::{Account, SqliteAccountStore};
use crate::auth::{CredentialAuthenticator, HashParams, SecretHasher};
use crate::config::Config;
use crate::db::DbPool;
use crate::mail::{
    ensure_owned, AccountScoped, EmailQueryService, ListQuery, Message, MessageSummary, Page,
    QueryLimits, RawListQuery, SqliteEmailQueryService,
};
use crate::sync::{trigger_sync, HttpSyncEngine, NoopSyncEngine, SyncEngine};
use crate::{MailGateError, Result};

const LIST_FAILURE: &str = "failed to get emails";
const DETAIL_FAILURE: &str = "failed to get email";

/// Public email lookup service.
#[derive(Clone)]
pub struct MailLookupService {
    authenticator: CredentialAuthenticator,
    emails: Arc<dyn EmailQueryService>,
    sync: Arc<dyn SyncEngine>,
    limits: QueryLimits,
}

impl MailLookupService {
    /// Create a new lookup service from its collaborators.
    pub fn new(
        authenticator: CredentialAuthenticator,
        emails: Arc<dyn EmailQueryService>,
        sync: Arc<dyn SyncEngine>,
        limits: QueryLimits,
    ) -> Self {
        Self {
            authenticator,
            emails,
            sync,
            limits,
        }
    }

    /// Wire up the SQLite-backed service described by `config`.
    ///
    /// Uses [`HttpSyncEngine`] when sync is enabled, [`NoopSyncEngine`]
    /// otherwise.
    pub fn from_config(config: &Config, pool: DbPool) -> Result<Self> {
        let hasher = SecretHasher::new(HashParams::from(&config.auth))
            .map_err(|e| MailGateError::Config(format!("invalid argon2 parameters: {e}")))?;
        let store = SqliteAccountStore::new(pool.clone(), &hasher)?;

        let sync: Arc<dyn SyncEngine> = if config.sync.enabled {
            info!(endpoint = %config.sync.endpoint, "Mailbox sync enabled");
            Arc::new(HttpSyncEngine::from_config(&config.sync)?)
        } else {
            info!("Mailbox sync disabled");
            Arc::new(NoopSyncEngine)
        };

        Ok(Self::new(
            CredentialAuthenticator::new(Arc::new(store)),
            Arc::new(SqliteEmailQueryService::new(pool)),
            sync,
            QueryLimits::from(&config.query),
        ))
    }

    /// Page size bounds used when normalizing listing queries.
    pub fn limits(&self) -> &QueryLimits {
        &self.limits
    }

    /// Check an email/secret pair and return the account it unlocks.
    pub async fn verify_credential(&self, email: &str, secret: &str) -> Result<Account> {
        let account = self.authenticator.authenticate(email, secret).await?;
        info!(account_id = account.id, "Credential check succeeded");
        Ok(account)
    }

    /// List the authenticated account's stored messages.
    pub async fn list_messages(
        &self,
        email: &str,
        secret: &str,
        raw: &RawListQuery,
    ) -> Result<Page<MessageSummary>> {
        let account = self.authenticator.authenticate(email, secret).await?;
        let query = raw.normalize(&self.limits);
        self.query_page(&account, &query).await
    }

    /// Sync the authenticated account, then list its messages.
    ///
    /// The sync outcome never affects the response. Folder filtering is not
    /// available on this path.
    pub async fn sync_and_list_messages(
        &self,
        email: &str,
        secret: &str,
        raw: &RawListQuery,
    ) -> Result<Page<MessageSummary>> {
        let account = self.authenticator.authenticate(email, secret).await?;
        let query = ListQuery {
            folder_id: None,
            ..raw.normalize(&self.limits)
        };
        trigger_sync(self.sync.as_ref(), account.id).await;
        self.query_page(&account, &query).await
    }

    /// Fetch one message, provided the authenticated account owns it.
    pub async fn get_message_detail(
        &self,
        email: &str,
        secret: &str,
        email_id: i64,
    ) -> Result<Message> {
        let account = self.authenticator.authenticate(email, secret).await?;

        let message = self
            .emails
            .get(email_id)
            .await
            .map_err(|e| {
                error!(account_id = account.id, email_id, error = %e, "Email fetch failed");
                MailGateError::Upstream(DETAIL_FAILURE.to_string())
            })?
            .ok_or_else(|| MailGateError::NotFound("email".to_string()))?;

        ensure_owned(message, &account)
    }

    async fn query_page(&self, account: &Account, query: &ListQuery) -> Result<Page<MessageSummary>> {
        let page = self.emails.query(account.id, query).await.map_err(|e| {
            error!(account_id = account.id, error = %e, "Email query failed");
            MailGateError::Upstream(LIST_FAILURE.to_string())
        })?;

        if let Some(stray) = page.items.iter().find(|m| m.account_id() != account.id) {
            error!(
                account_id = account.id,
                email_id = stray.id,
                "Email query returned a message from another account"
            );
            return Err(MailGateError::Upstream(LIST_FAILURE.to_string()));
        }

        Ok(page)
    }
}
