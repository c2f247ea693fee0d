//! HTTP sync engine.
//!
//! Delegates synchronization to a mail sync service by POSTing to
//! `{endpoint}/accounts/{id}/sync`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::SyncEngine;
use crate::config::SyncConfig;
use crate::{MailGateError, Result};

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// User agent string for sync requests.
const USER_AGENT: &str = concat!("mailgate/", env!("CARGO_PKG_VERSION"));

/// Sync engine backed by a remote sync service.
#[derive(Clone)]
pub struct HttpSyncEngine {
    client: Client,
    endpoint: String,
}

impl HttpSyncEngine {
    /// Create an engine for `endpoint` with the given total request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MailGateError::Sync(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Create an engine from configuration.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Self::new(&config.endpoint, Duration::from_secs(config.timeout_secs))
    }

    fn sync_url(&self, account_id: i64) -> String {
        format!("{}/accounts/{}/sync", self.endpoint, account_id)
    }
}

#[async_trait]
impl SyncEngine for HttpSyncEngine {
    async fn sync(&self, account_id: i64) -> Result<()> {
        let url = self.sync_url(account_id);
        debug!(account_id, url = %url, "Requesting sync");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| MailGateError::Sync(format!("failed to reach sync service: {}", e)))?;

        if !response.status().is_success() {
            return Err(MailGateError::Sync(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        Ok(())
    }
}
