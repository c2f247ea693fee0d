//! Message and folder repositories for mailgate.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};

use super::query::ListQuery;
use super::types::{Folder, Message, MessageSummary, NewMessage, Page};
use crate::db::DbPool;
use crate::{MailGateError, Result};

const MESSAGE_COLUMNS: &str = "id, account_id, folder_id, message_id, subject, from_address, \
     to_addresses, cc_addresses, date, preview, text_body, html_body, is_read, is_starred, \
     size, created_at";

const SUMMARY_COLUMNS: &str = "id, account_id, folder_id, subject, from_address, to_addresses, \
     date, preview, is_read, is_starred, size";

/// Columns matched by free-text search.
const SEARCH_COLUMNS: &[&str] = &["subject", "from_address", "to_addresses", "text_body"];

/// Escape `%`, `_` and `\` so user input matches literally under `ESCAPE '\'`.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Append the WHERE clause for an account-scoped listing.
///
/// The account predicate is always present; folder and search only narrow it.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, account_id: i64, query: &ListQuery) {
    qb.push(" WHERE account_id = ").push_bind(account_id);

    if let Some(folder_id) = query.folder_id {
        qb.push(" AND folder_id = ").push_bind(folder_id);
    }

    if let Some(search) = &query.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (");
        for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*column)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        qb.push(")");
    }
}

/// Repository for message operations.
pub struct MessageRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new MessageRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Store a new message.
    pub async fn create(&self, new_message: &NewMessage) -> Result<Message> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO emails (account_id, folder_id, message_id, subject, from_address,
                                 to_addresses, cc_addresses, date, preview, text_body, html_body,
                                 is_read, is_starred, size, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING id",
        )
        .bind(new_message.account_id)
        .bind(new_message.folder_id)
        .bind(&new_message.message_id)
        .bind(&new_message.subject)
        .bind(&new_message.from_address)
        .bind(&new_message.to_addresses)
        .bind(&new_message.cc_addresses)
        .bind(new_message.date)
        .bind(new_message.preview())
        .bind(&new_message.text_body)
        .bind(&new_message.html_body)
        .bind(new_message.is_read)
        .bind(new_message.is_starred)
        .bind(new_message.size())
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| MailGateError::NotFound("email".to_string()))
    }

    /// Get a message by ID, regardless of owner.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Message>> {
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM emails WHERE id = $1");
        let message = sqlx::query_as::<_, Message>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(message)
    }

    /// List one page of an account's messages.
    ///
    /// Rows are ordered by the requested field with `id` as a tiebreaker in
    /// the same direction, so paging is stable.
    pub async fn list_for_account(
        &self,
        account_id: i64,
        query: &ListQuery,
    ) -> Result<Page<MessageSummary>> {
        let mut count_qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM emails");
        push_filters(&mut count_qb, account_id, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {SUMMARY_COLUMNS} FROM emails"));
        push_filters(&mut qb, account_id, query);
        let direction = query.sort_order.sql();
        qb.push(format!(
            " ORDER BY {} {direction}, id {direction}",
            query.sort_by.column()
        ));
        qb.push(" LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());

        let items = qb
            .build_query_as::<MessageSummary>()
            .fetch_all(self.pool)
            .await?;

        Ok(Page {
            items,
            total,
            page: query.page,
            page_size: query.page_size,
        })
    }
}

/// Repository for folder operations.
pub struct FolderRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FolderRepository<'a> {
    /// Create a new FolderRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a folder for an account.
    pub async fn create(&self, account_id: i64, name: &str) -> Result<Folder> {
        let folder = sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (account_id, name) VALUES ($1, $2)
             RETURNING id, account_id, name",
        )
        .bind(account_id)
        .bind(name)
        .fetch_one(self.pool)
        .await?;
        Ok(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountRepository, NewAccount};
    use crate::auth::{HashParams, SecretHasher};
    use crate::db::Database;
    use crate::mail::query::{QueryLimits, RawListQuery, SortField, SortOrder};
    use chrono::{TimeZone, Utc};

    async fn setup() -> (Database, i64, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let hasher = SecretHasher::new(HashParams::minimal()).unwrap();
        let accounts = AccountRepository::new(db.pool());
        let a = accounts
            .create(&NewAccount::new(1, "a@example.com", "pw", "A"), &hasher)
            .await
            .unwrap();
        let b = accounts
            .create(&NewAccount::new(2, "b@example.com", "pw", "B"), &hasher)
            .await
            .unwrap();
        (db, a.id, b.id)
    }

    fn day(d: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    fn query(raw: RawListQuery) -> ListQuery {
        raw.normalize(&QueryLimits::default())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (db, a, _) = setup().await;
        let repo = MessageRepository::new(db.pool());

        let msg = repo
            .create(
                &NewMessage::new(a, "Hello", "x@example.com", day(1))
                    .with_message_id("<1@example.com>")
                    .with_text_body("Body text"),
            )
            .await
            .unwrap();

        let fetched = repo.get_by_id(msg.id).await.unwrap().unwrap();
        assert_eq!(fetched.account_id, a);
        assert_eq!(fetched.subject, "Hello");
        assert_eq!(fetched.date, day(1));
        assert_eq!(fetched.preview, "Body text");
        assert_eq!(fetched.text_body.as_deref(), Some("Body text"));
        assert!(!fetched.is_read);

        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_account() {
        let (db, a, b) = setup().await;
        let repo = MessageRepository::new(db.pool());

        for d in 1..=3 {
            repo.create(&NewMessage::new(a, format!("A{d}"), "x@example.com", day(d)))
                .await
                .unwrap();
        }
        repo.create(&NewMessage::new(b, "B1", "y@example.com", day(5)))
            .await
            .unwrap();

        let page = repo
            .list_for_account(a, &ListQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 3);
        assert!(page.items.iter().all(|m| m.account_id == a));
        // Newest first by default.
        let subjects: Vec<_> = page.items.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, ["A3", "A2", "A1"]);

        let other = repo.list_for_account(b, &ListQuery::default()).await.unwrap();
        assert_eq!(other.total, 1);
        assert_eq!(other.items[0].subject, "B1");
    }

    #[tokio::test]
    async fn test_pagination() {
        let (db, a, _) = setup().await;
        let repo = MessageRepository::new(db.pool());
        for d in 1..=5 {
            repo.create(&NewMessage::new(a, format!("M{d}"), "x@example.com", day(d)))
                .await
                .unwrap();
        }

        let q = query(RawListQuery {
            page: Some(2),
            page_size: Some(2),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        });
        let page = repo.list_for_account(a, &q).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages(), 3);
        let subjects: Vec<_> = page.items.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, ["M3", "M4"]);

        let past_end = query(RawListQuery {
            page: Some(10),
            page_size: Some(2),
            ..Default::default()
        });
        let page = repo.list_for_account(a, &past_end).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn test_ties_broken_by_id() {
        let (db, a, _) = setup().await;
        let repo = MessageRepository::new(db.pool());
        let first = repo
            .create(&NewMessage::new(a, "Same", "x@example.com", day(1)))
            .await
            .unwrap();
        let second = repo
            .create(&NewMessage::new(a, "Same", "x@example.com", day(1)))
            .await
            .unwrap();

        let desc = repo
            .list_for_account(a, &ListQuery::default())
            .await
            .unwrap();
        let ids: Vec<_> = desc.items.iter().map(|m| m.id).collect();
        assert_eq!(ids, [second.id, first.id]);

        let asc = ListQuery {
            sort_order: SortOrder::Asc,
            ..ListQuery::default()
        };
        let page = repo.list_for_account(a, &asc).await.unwrap();
        let ids: Vec<_> = page.items.iter().map(|m| m.id).collect();
        assert_eq!(ids, [first.id, second.id]);
    }

    #[tokio::test]
    async fn test_sort_by_subject() {
        let (db, a, _) = setup().await;
        let repo = MessageRepository::new(db.pool());
        for (d, subject) in [(1, "banana"), (2, "Apple"), (3, "cherry")] {
            repo.create(&NewMessage::new(a, subject, "x@example.com", day(d)))
                .await
                .unwrap();
        }

        let q = ListQuery {
            sort_by: SortField::Subject,
            sort_order: SortOrder::Asc,
            ..ListQuery::default()
        };
        let page = repo.list_for_account(a, &q).await.unwrap();
        let subjects: Vec<_> = page.items.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, ["Apple", "banana", "cherry"]);
    }

    #[tokio::test]
    async fn test_sort_by_each_field() {
        let (db, a, _) = setup().await;
        let repo = MessageRepository::new(db.pool());

        // (from, size, created day); the 2nd and 4th rows tie on every field.
        let rows = [
            ("carol@example.com", 10, 3),
            ("Alice@example.com", 30, 1),
            ("bob@example.com", 20, 2),
            ("alice@example.com", 30, 1),
        ];
        let mut ids = Vec::new();
        for (from, size, created) in rows {
            let msg = repo
                .create(&NewMessage::new(a, "Same subject", from, day(1)))
                .await
                .unwrap();
            sqlx::query("UPDATE emails SET size = $1, created_at = $2 WHERE id = $3")
                .bind(size)
                .bind(day(created))
                .bind(msg.id)
                .execute(db.pool())
                .await
                .unwrap();
            ids.push(msg.id);
        }

        let cases = [
            (SortField::From, [ids[1], ids[3], ids[2], ids[0]]),
            (SortField::Size, [ids[0], ids[2], ids[1], ids[3]]),
            (SortField::CreatedAt, [ids[1], ids[3], ids[2], ids[0]]),
            (SortField::Date, [ids[0], ids[1], ids[2], ids[3]]),
        ];
        for (field, ascending) in cases {
            let asc = ListQuery {
                sort_by: field,
                sort_order: SortOrder::Asc,
                ..ListQuery::default()
            };
            let page = repo.list_for_account(a, &asc).await.unwrap();
            let got: Vec<_> = page.items.iter().map(|m| m.id).collect();
            assert_eq!(got, ascending, "{field} asc");

            let desc = ListQuery {
                sort_order: SortOrder::Desc,
                ..asc
            };
            let page = repo.list_for_account(a, &desc).await.unwrap();
            let got: Vec<_> = page.items.iter().map(|m| m.id).collect();
            let mut descending = ascending;
            descending.reverse();
            assert_eq!(got, descending, "{field} desc");
        }
    }

    #[tokio::test]
    async fn test_search() {
        let (db, a, b) = setup().await;
        let repo = MessageRepository::new(db.pool());
        repo.create(&NewMessage::new(a, "Invoice #42", "billing@example.com", day(1)))
            .await
            .unwrap();
        repo.create(
            &NewMessage::new(a, "Lunch", "friend@example.com", day(2))
                .with_text_body("about the invoice"),
        )
        .await
        .unwrap();
        repo.create(&NewMessage::new(a, "Unrelated", "news@example.com", day(3)))
            .await
            .unwrap();
        repo.create(&NewMessage::new(b, "Invoice for B", "billing@example.com", day(4)))
            .await
            .unwrap();

        let q = query(RawListQuery {
            search: Some("invoice".to_string()),
            ..Default::default()
        });
        let page = repo.list_for_account(a, &q).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|m| m.account_id == a));
    }

    #[tokio::test]
    async fn test_search_wildcards_are_literal() {
        let (db, a, _) = setup().await;
        let repo = MessageRepository::new(db.pool());
        repo.create(&NewMessage::new(a, "50% off", "x@example.com", day(1)))
            .await
            .unwrap();
        repo.create(&NewMessage::new(a, "500 items", "x@example.com", day(2)))
            .await
            .unwrap();

        let q = query(RawListQuery {
            search: Some("50%".to_string()),
            ..Default::default()
        });
        let page = repo.list_for_account(a, &q).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].subject, "50% off");

        let q = query(RawListQuery {
            search: Some("_".to_string()),
            ..Default::default()
        });
        assert_eq!(repo.list_for_account(a, &q).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_folder_filter() {
        let (db, a, _) = setup().await;
        let folders = FolderRepository::new(db.pool());
        let inbox = folders.create(a, "INBOX").await.unwrap();
        let archive = folders.create(a, "Archive").await.unwrap();

        let repo = MessageRepository::new(db.pool());
        repo.create(&NewMessage::new(a, "In inbox", "x@example.com", day(1)).in_folder(inbox.id))
            .await
            .unwrap();
        repo.create(
            &NewMessage::new(a, "Archived", "x@example.com", day(2)).in_folder(archive.id),
        )
        .await
        .unwrap();

        let q = ListQuery {
            folder_id: Some(inbox.id),
            ..ListQuery::default()
        };
        let page = repo.list_for_account(a, &q).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].subject, "In inbox");
        assert_eq!(inbox.account_id, a);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_\\"), "50\\%\\_\\\\");
    }
}
