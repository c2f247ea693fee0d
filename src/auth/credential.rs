//! Credential authentication for the public lookup endpoints.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::account::{Account, AccountStore};
use crate::{MailGateError, Result};

/// Turns an (email, secret) pair into an authenticated [`Account`].
///
/// Every failure, whether an unknown email, a wrong secret or a store fault,
/// is reported as [`MailGateError::Unauthorized`]. Callers cannot tell the
/// causes apart.
#[derive(Clone)]
pub struct CredentialAuthenticator {
    store: Arc<dyn AccountStore>,
}

impl CredentialAuthenticator {
    /// Create an authenticator over the given account store.
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Authenticate by email and secret.
    pub async fn authenticate(&self, email: &str, secret: &str) -> Result<Account> {
        if email.is_empty() || secret.is_empty() {
            return Err(MailGateError::Unauthorized);
        }

        match self.store.find_by_credential(email, secret).await {
            Ok(Some(account)) => {
                debug!(account_id = account.id, "Credential verified");
                Ok(account)
            }
            Ok(None) => {
                warn!("Credential verification failed");
                Err(MailGateError::Unauthorized)
            }
            Err(e) => {
                warn!(error = %e, "Credential lookup failed");
                Err(MailGateError::Unauthorized)
            }
        }
    }
}
