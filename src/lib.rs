//! mailgate - credential-gated public email lookup.
//!
//! Lets a caller holding an email account's address and secret list and read
//! that account's stored messages over a small JSON API, without a session.

pub mod account;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod mail;
pub mod sync;
pub mod web;

pub use account::{Account, AccountRepository, AccountStore, NewAccount, SqliteAccountStore};
pub use auth::{CredentialAuthenticator, HashParams, SecretHasher};
pub use config::Config;
pub use db::{Database, DbPool};
pub use error::{MailGateError, Result};
pub use lookup::MailLookupService;
pub use mail::{
    EmailQueryService, ListQuery, Message, MessageRepository, MessageSummary, NewMessage, Page,
    QueryLimits, RawListQuery, SqliteEmailQueryService,
};
pub use sync::{HttpSyncEngine, NoopSyncEngine, SyncEngine};
pub use web::{AppState, WebServer};
