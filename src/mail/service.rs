//! Email query service.
//!
//! The lookup layer reads messages through [`EmailQueryService`] so the
//! storage behind it can be swapped or faked in tests.

use async_trait::async_trait;

use super::query::ListQuery;
use super::repository::MessageRepository;
use super::types::{Message, MessageSummary, Page};
use crate::db::DbPool;
use crate::Result;

/// Read access to stored messages.
#[async_trait]
pub trait EmailQueryService: Send + Sync {
    /// One page of the account's messages.
    async fn query(&self, account_id: i64, query: &ListQuery) -> Result<Page<MessageSummary>>;

    /// A single message by ID, whoever owns it.
    async fn get(&self, id: i64) -> Result<Option<Message>>;
}

/// [`EmailQueryService`] backed by the SQLite message table.
#[derive(Clone)]
pub struct SqliteEmailQueryService {
    pool: DbPool,
}

impl SqliteEmailQueryService {
    /// Create a new service over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailQueryService for SqliteEmailQueryService {
    async fn query(&self, account_id: i64, query: &ListQuery) -> Result<Page<MessageSummary>> {
        MessageRepository::new(&self.pool)
            .list_for_account(account_id, query)
            .await
    }

    async fn get(&self, id: i64) -> Result<Option<Message>> {
        MessageRepository::new(&self.pool).get_by_id(id).await
    }
}
