//! Mail module for mailgate.
//!
//! Stored messages, account-scoped listing queries and the ownership check
//! applied when a single message is fetched by ID.

mod ownership;
mod query;
mod repository;
mod service;
mod types;

pub use ownership::ensure_owned;
pub use query::{
    ListQuery, QueryLimits, RawListQuery, SortField, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE,
    MAX_PAGE_SIZE, MAX_SEARCH_LENGTH,
};
pub use repository::{FolderRepository, MessageRepository};
pub use service::{EmailQueryService, SqliteEmailQueryService};
pub use types::{
    AccountScoped, Folder, Message, MessageSummary, NewMessage, Page, PREVIEW_LENGTH,
};
