//! Mail types for mailgate.

use chrono::{DateTime, Utc};

/// Maximum length of the generated preview, in characters.
pub const PREVIEW_LENGTH: usize = 200;

/// A stored email message with its full content.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Message {
    /// Message ID.
    pub id: i64,
    /// ID of the owning account.
    pub account_id: i64,
    /// Folder ID, if filed.
    pub folder_id: Option<i64>,
    /// RFC 5322 Message-ID header.
    pub message_id: String,
    /// Subject line.
    pub subject: String,
    /// From header.
    pub from_address: String,
    /// To header.
    pub to_addresses: String,
    /// Cc header.
    pub cc_addresses: String,
    /// Date the message was sent.
    pub date: DateTime<Utc>,
    /// Short plain-text preview.
    pub preview: String,
    /// Plain-text body.
    pub text_body: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
    /// Whether the message has been read.
    pub is_read: bool,
    /// Whether the message is starred.
    pub is_starred: bool,
    /// Size in bytes.
    pub size: i64,
    /// When the message was stored.
    pub created_at: DateTime<Utc>,
}

/// A listing row: a message without its bodies.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MessageSummary {
    /// Message ID.
    pub id: i64,
    /// ID of the owning account.
    pub account_id: i64,
    /// Folder ID, if filed.
    pub folder_id: Option<i64>,
    /// Subject line.
    pub subject: String,
    /// From header.
    pub from_address: String,
    /// To header.
    pub to_addresses: String,
    /// Date the message was sent.
    pub date: DateTime<Utc>,
    /// Short plain-text preview.
    pub preview: String,
    /// Whether the message has been read.
    pub is_read: bool,
    /// Whether the message is starred.
    pub is_starred: bool,
    /// Size in bytes.
    pub size: i64,
}

/// Anything stored under exactly one account.
pub trait AccountScoped {
    /// ID of the owning account.
    fn account_id(&self) -> i64;
}

impl AccountScoped for Message {
    fn account_id(&self) -> i64 {
        self.account_id
    }
}

impl AccountScoped for MessageSummary {
    fn account_id(&self) -> i64 {
        self.account_id
    }
}

/// A mail folder.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Folder {
    /// Folder ID.
    pub id: i64,
    /// ID of the owning account.
    pub account_id: i64,
    /// Folder name (e.g. "INBOX").
    pub name: String,
}

/// New message for storage.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// ID of the owning account.
    pub account_id: i64,
    /// Folder ID.
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
    /// Date the message was sent.
    pub date: DateTime<Utc>,
    /// Plain-text body.
    pub text_body: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
    /// Read flag.
    pub is_read: bool,
    /// Starred flag.
    pub is_starred: bool,
}

impl NewMessage {
    /// Create a new message with the required fields.
    pub fn new(
        account_id: i64,
        subject: impl Into<String>,
        from_address: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            folder_id: None,
            message_id: String::new(),
            subject: subject.into(),
            from_address: from_address.into(),
            to_addresses: String::new(),
            cc_addresses: String::new(),
            date,
            text_body: None,
            html_body: None,
            is_read: false,
            is_starred: false,
        }
    }

    /// Set the folder.
    pub fn in_folder(mut self, folder_id: i64) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    /// Set the Message-ID header.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    /// Set the To header.
    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to_addresses = to.into();
        self
    }

    /// Set the plain-text body.
    pub fn with_text_body(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Set the HTML body.
    pub fn with_html_body(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Mark as read.
    pub fn read(mut self) -> Self {
        self.is_read = true;
        self
    }

    /// Preview derived from the plain-text body: whitespace collapsed,
    /// truncated to [`PREVIEW_LENGTH`] characters.
    pub fn preview(&self) -> String {
        let Some(body) = &self.text_body else {
            return String::new();
        };
        body.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(PREVIEW_LENGTH)
            .collect()
    }

    /// Approximate size in bytes of headers plus bodies.
    pub fn size(&self) -> i64 {
        let bodies = self.text_body.as_deref().map_or(0, str::len)
            + self.html_body.as_deref().map_or(0, str::len);
        (self.subject.len()
            + self.from_address.len()
            + self.to_addresses.len()
            + self.cc_addresses.len()
            + bodies) as i64
    }
}

/// One page of an ordered result set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: i64,
    /// 1-based page number.
    pub page: u32,
    /// Page size used for this query.
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` items; zero when there are none.
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 || self.total <= 0 {
            return 0;
        }
        let size = i64::from(self.page_size);
        ((self.total + size - 1) / size) as u32
    }

    /// Check if there are more items after this page.
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Map the items, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}
