//! Email account module for mailgate.
//!
//! Accounts are the ownership unit for every message. This module provides
//! the account model, its repository, and the credential lookup used by the
//! authenticator.

mod model;
mod repository;
mod store;

pub use model::{Account, NewAccount};
pub use repository::AccountRepository;
pub use store::{AccountStore, SqliteAccountStore};
