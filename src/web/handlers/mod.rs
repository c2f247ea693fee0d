//! API handlers for the public lookup endpoints.

pub mod public;

pub use public::*;

use crate::lookup::MailLookupService;

/// Application state shared by all handlers.
pub struct AppState {
    /// Credential-gated email lookup.
    pub lookup: MailLookupService,
}

impl AppState {
    /// Create a new application state.
    pub fn new(lookup: MailLookupService) -> Self {
        Self { lookup }
    }
}
