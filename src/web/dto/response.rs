//! Response DTOs for the public lookup endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::account::Account;
use crate::mail::{Message, MessageSummary, Page};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Successful credential check.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    /// Always true; failures are reported as errors.
    pub valid: bool,
    /// Account ID.
    pub account_id: i64,
    /// Account email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Provider tag.
    pub provider: String,
}

impl From<Account> for VerifyResponse {
    fn from(account: Account) -> Self {
        Self {
            valid: true,
            account_id: account.id,
            email: account.email,
            name: account.name,
            provider: account.provider,
        }
    }
}

/// Message in a listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmailSummaryResponse {
    /// Message ID.
    pub id: i64,
    /// Owning account ID.
    pub account_id: i64,
    /// Folder ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
    /// Subject line.
    pub subject: String,
    /// From header.
    pub from_address: String,
    /// To header.
    pub to_addresses: String,
    /// Sent date (RFC 3339).
    pub date: String,
    /// Short plain-text preview.
    pub preview: String,
    /// Read flag.
    pub is_read: bool,
    /// Starred flag.
    pub is_starred: bool,
    /// Size in bytes.
    pub size: i64,
}

impl From<MessageSummary> for EmailSummaryResponse {
    fn from(m: MessageSummary) -> Self {
        Self {
            id: m.id,
            account_id: m.account_id,
            folder_id: m.folder_id,
            subject: m.subject,
            from_address: m.from_address,
            to_addresses: m.to_addresses,
            date: m.date.to_rfc3339(),
            preview: m.preview,
            is_read: m.is_read,
            is_starred: m.is_starred,
            size: m.size,
        }
    }
}

/// One page of messages.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmailListResponse {
    /// Messages on this page.
    pub emails: Vec<EmailSummaryResponse>,
    /// Total matching messages.
    pub total: i64,
    /// Page number.
    pub page: u32,
    /// Page size.
    pub page_size: u32,
    /// Number of pages.
    pub total_pages: u32,
}

impl From<Page<MessageSummary>> for EmailListResponse {
    fn from(page: Page<MessageSummary>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(EmailSummaryResponse::from);
        Self {
            emails: page.items,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
        }
    }
}

/// Full message.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmailDetailResponse {
    /// Message ID.
    pub id: i64,
    /// Owning account ID.
    pub account_id: i64,
    /// Folder ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
    /// Message-ID header.
    pub message_id: String,
    /// Subject line.
    pub subject: String,
    /// From header.
    pub from_address: String,
    /// To header.
    pub to_addresses: String,
    /// Cc header.
    pub cc_addresses: String,
    /// Sent date (RFC 3339).
    pub date: String,
    /// Short plain-text preview.
    pub preview: String,
    /// Plain-text body.
    pub text_body: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
    /// Read flag.
    pub is_read: bool,
    /// Starred flag.
    pub is_starred: bool,
    /// Size in bytes.
    pub size: i64,
    /// Storage timestamp (RFC 3339).
    pub created_at: String,
}

impl From<Message> for EmailDetailResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            account_id: m.account_id,
            folder_id: m.folder_id,
            message_id: m.message_id,
            subject: m.subject,
            from_address: m.from_address,
            to_addresses: m.to_addresses,
            cc_addresses: m.cc_addresses,
            date: m.date.to_rfc3339(),
            preview: m.preview,
            text_body: m.text_body,
            html_body: m.html_body,
            is_read: m.is_read,
            is_starred: m.is_starred,
            size: m.size,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}
