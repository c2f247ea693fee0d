//! Ownership checks for individually fetched messages.

use super::types::AccountScoped;
use crate::account::Account;
use crate::{MailGateError, Result};

/// Return `item` only if it belongs to `account`.
pub fn ensure_owned<T: AccountScoped>(item: T, account: &Account) -> Result<T> {
    if item.account_id() == account.id {
        Ok(item)
    } else {
        Err(MailGateError::Forbidden(
            "email does not belong to this account".to_string(),
        ))
    }
}
