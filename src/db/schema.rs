//! Database schema and migrations for mailgate.
//!
//! Migrations are applied in order when the database is opened. The
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Email accounts
    r#"
CREATE TABLE email_accounts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         INTEGER NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    password_hash   TEXT NOT NULL,           -- Argon2id PHC string
    name            TEXT NOT NULL,
    provider        TEXT NOT NULL,           -- 'gmail', 'outlook', 'custom', ...
    created_at      TEXT NOT NULL
);

CREATE INDEX idx_email_accounts_user_id ON email_accounts(user_id);
"#,
    // v2: Folders
    r#"
CREATE TABLE folders (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id  INTEGER NOT NULL REFERENCES email_accounts(id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    UNIQUE(account_id, name)
);
"#,
    // v3: Emails
    r#"
CREATE TABLE emails (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id      INTEGER NOT NULL REFERENCES email_accounts(id) ON DELETE CASCADE,
    folder_id       INTEGER REFERENCES folders(id) ON DELETE SET NULL,
    message_id      TEXT NOT NULL,
    subject         TEXT NOT NULL DEFAULT '',
    from_address    TEXT NOT NULL DEFAULT '',
    to_addresses    TEXT NOT NULL DEFAULT '',
    cc_addresses    TEXT NOT NULL DEFAULT '',
    date            TEXT NOT NULL,
    preview         TEXT NOT NULL DEFAULT '',
    text_body       TEXT,
    html_body       TEXT,
    is_read         INTEGER NOT NULL DEFAULT 0,
    is_starred      INTEGER NOT NULL DEFAULT 0,
    size            INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

CREATE INDEX idx_emails_account_date ON emails(account_id, date);
CREATE INDEX idx_emails_folder_id ON emails(folder_id);
"#,
];
