//! Mailbox synchronization for mailgate.
//!
//! A sync refreshes an account's stored messages from its mail provider.
//! The public endpoints only ever trigger it on a best-effort basis: a
//! failed sync is logged and the caller is served from whatever is stored.

mod http;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::Result;

pub use http::HttpSyncEngine;

/// Something that can refresh an account's mailbox.
#[async_trait]
pub trait SyncEngine: Send + Sync {
    /// Synchronize one account. Returns once the sync has finished or failed.
    async fn sync(&self, account_id: i64) -> Result<()>;
}

/// Sync engine that does nothing and always succeeds.
///
/// Used when no sync endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSyncEngine;

#[async_trait]
impl SyncEngine for NoopSyncEngine {
    async fn sync(&self, account_id: i64) -> Result<()> {
        debug!(account_id, "Sync disabled, skipping");
        Ok(())
    }
}

/// Run a sync and swallow any failure.
///
/// Returns whether the sync succeeded.
pub async fn trigger_sync(engine: &dyn SyncEngine, account_id: i64) -> bool {
    match engine.sync(account_id).await {
        Ok(()) => {
            debug!(account_id, "Sync completed");
            true
        }
        Err(e) => {
            warn!(account_id, error = %e, "Sync failed, serving stored messages");
            false
        }
    }
}
