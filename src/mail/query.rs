//! Listing query parameters and their normalization.
//!
//! [`RawListQuery`] carries whatever the caller sent. [`RawListQuery::normalize`]
//! turns it into a [`ListQuery`] that is always in range and safe to hand to
//! storage as-is.

use std::fmt;

use crate::config::QueryConfig;

/// Largest page number accepted; higher values are clamped.
pub const MAX_PAGE: u32 = 10_000;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default page size ceiling.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Longest search string kept, in characters.
pub const MAX_SEARCH_LENGTH: usize = 200;

/// Page size bounds applied during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Page size used when the caller omits one.
    pub default_page_size: u32,
    /// Largest allowed page size.
    pub max_page_size: u32,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl From<&QueryConfig> for QueryLimits {
    fn from(config: &QueryConfig) -> Self {
        let max_page_size = config.max_page_size.max(1);
        Self {
            default_page_size: config.default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }
}

/// Sortable message fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Sent date.
    #[default]
    Date,
    /// Subject line.
    Subject,
    /// From header.
    From,
    /// Size in bytes.
    Size,
    /// Time the message was stored.
    CreatedAt,
}

impl SortField {
    /// Parse a caller-supplied field name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Some(SortField::Date),
            "subject" => Some(SortField::Subject),
            "from" => Some(SortField::From),
            "size" => Some(SortField::Size),
            "created_at" => Some(SortField::CreatedAt),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Subject => "subject",
            SortField::From => "from",
            SortField::Size => "size",
            SortField::CreatedAt => "created_at",
        }
    }

    /// SQL ordering expression for this field.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Subject => "subject COLLATE NOCASE",
            SortField::From => "from_address COLLATE NOCASE",
            SortField::Size => "size",
            SortField::CreatedAt => "created_at",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse a caller-supplied direction (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Asc),
            "desc" | "descending" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// SQL keyword.
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing parameters exactly as the caller supplied them.
#[derive(Debug, Clone, Default)]
pub struct RawListQuery {
    /// Page number.
    pub page: Option<i64>,
    /// Page size.
    pub page_size: Option<i64>,
    /// Sort field name.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_order: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Folder filter.
    pub folder_id: Option<i64>,
}

impl RawListQuery {
    /// Fill defaults and clamp every field into range.
    ///
    /// - page: missing or non-positive → 1, then at most [`MAX_PAGE`]
    /// - page size: missing or non-positive → the default, then at most the ceiling
    /// - sort field: missing or unknown → `date`
    /// - sort direction: missing or unknown → `desc`
    /// - search: trimmed, empty → none, truncated to [`MAX_SEARCH_LENGTH`]
    pub fn normalize(&self, limits: &QueryLimits) -> ListQuery {
        let page = match self.page {
            Some(p) if p > 0 => p.min(i64::from(MAX_PAGE)) as u32,
            _ => 1,
        };

        let max_page_size = limits.max_page_size.max(1);
        let page_size = match self.page_size {
            Some(s) if s > 0 => s.min(i64::from(max_page_size)) as u32,
            _ => limits.default_page_size.clamp(1, max_page_size),
        };

        let sort_by = self
            .sort_by
            .as_deref()
            .and_then(SortField::parse)
            .unwrap_or_default();

        let sort_order = self
            .sort_order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default();

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.chars().take(MAX_SEARCH_LENGTH).collect());

        ListQuery {
            page,
            page_size,
            sort_by,
            sort_order,
            search,
            folder_id: self.folder_id,
        }
    }
}

/// Normalized listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Sort field.
    pub sort_by: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Trimmed search text.
    pub search: Option<String>,
    /// Folder filter.
    pub folder_id: Option<i64>,
}

impl ListQuery {
    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// Number of rows to return.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        RawListQuery::default().normalize(&QueryLimits::default())
    }
}
