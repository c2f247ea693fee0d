//! Request DTOs for the public lookup endpoints.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::MAX_SECRET_LENGTH;
use crate::mail::{RawListQuery, MAX_SEARCH_LENGTH};

// `validator` length bounds are `u64`.
const MAX_SECRET_LEN: u64 = MAX_SECRET_LENGTH as u64;
const MAX_SEARCH_LEN: u64 = MAX_SEARCH_LENGTH as u64;

/// Credential check request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyRequest {
    /// Account email address.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Account secret.
    #[validate(length(min = 1, max = MAX_SECRET_LEN, message = "Must be 1 to 256 characters"))]
    pub password: String,
}

/// Message listing request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListRequest {
    /// Account email address.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Account secret.
    #[validate(length(min = 1, max = MAX_SECRET_LEN, message = "Must be 1 to 256 characters"))]
    pub password: String,
    /// Page number (default 1).
    #[serde(default)]
    pub page: Option<i64>,
    /// Items per page (default 20).
    #[serde(default)]
    pub page_size: Option<i64>,
    /// Sort field: date, subject, from, size or created_at.
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Sort direction: asc or desc.
    #[serde(default)]
    pub sort_order: Option<String>,
    /// Free-text search over subject, sender, recipients and body.
    #[serde(default)]
    #[validate(length(max = MAX_SEARCH_LEN, message = "Search is too long"))]
    pub search: Option<String>,
    /// Restrict to one folder.
    #[serde(default)]
    pub folder_id: Option<i64>,
}

impl ListRequest {
    /// Listing parameters as supplied.
    pub fn to_raw_query(&self) -> RawListQuery {
        RawListQuery {
            page: self.page,
            page_size: self.page_size,
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
            search: self.search.clone(),
            folder_id: self.folder_id,
        }
    }
}

/// Sync-then-list request. Same as [`ListRequest`] without a folder filter.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SyncAndListRequest {
    /// Account email address.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Account secret.
    #[validate(length(min = 1, max = MAX_SECRET_LEN, message = "Must be 1 to 256 characters"))]
    pub password: String,
    /// Page number (default 1).
    #[serde(default)]
    pub page: Option<i64>,
    /// Items per page (default 20).
    #[serde(default)]
    pub page_size: Option<i64>,
    /// Sort field.
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(default)]
    pub sort_order: Option<String>,
    /// Free-text search.
    #[serde(default)]
    #[validate(length(max = MAX_SEARCH_LEN, message = "Search is too long"))]
    pub search: Option<String>,
}

impl SyncAndListRequest {
    /// Listing parameters as supplied.
    pub fn to_raw_query(&self) -> RawListQuery {
        RawListQuery {
            page: self.page,
            page_size: self.page_size,
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
            search: self.search.clone(),
            folder_id: None,
        }
    }
}

/// Single message request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DetailRequest {
    /// Account email address.
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    /// Account secret.
    #[validate(length(min = 1, max = MAX_SECRET_LEN, message = "Must be 1 to 256 characters"))]
    pub password: String,
    /// ID of the message to fetch.
    #[validate(range(min = 1, message = "Must be a positive ID"))]
    pub email_id: i64,
}
