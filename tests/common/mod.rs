//! Shared helpers for the public API integration tests.
//!
//! Builds an in-memory database with two accounts and a handful of
//! messages, and wraps the full application in an `axum_test::TestServer`.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use mailgate::config::WebConfig;
use mailgate::mail::{FolderRepository, QueryLimits};
use mailgate::sync::SyncEngine;
use mailgate::web::create_app;
use mailgate::web::middleware::RateLimitState;
use mailgate::{
    Account, AccountRepository, AppState, CredentialAuthenticator, Database, HashParams,
    MailGateError, MailLookupService, Message, MessageRepository, NewAccount, NewMessage,
    NoopSyncEngine, SecretHasher, SqliteAccountStore, SqliteEmailQueryService,
};

pub const ALICE_EMAIL: &str = "alice@example.com";
pub const ALICE_SECRET: &str = "alice-app-password";
pub const BOB_EMAIL: &str = "bob@example.com";
pub const BOB_SECRET: &str = "bob-app-password";

/// Sync engine that always fails.
pub struct FailingSync;

#[async_trait]
impl SyncEngine for FailingSync {
    async fn sync(&self, _account_id: i64) -> mailgate::Result<()> {
        Err(MailGateError::Sync("provider unreachable".to_string()))
    }
}

/// A running test application with seeded data.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub alice: Account,
    pub bob: Account,
    /// Alice's messages, oldest first.
    pub alice_messages: Vec<Message>,
    /// Bob's messages, oldest first.
    pub bob_messages: Vec<Message>,
    /// Alice's INBOX folder.
    pub alice_inbox: i64,
}

/// Create a test configuration.
pub fn create_test_config() -> WebConfig {
    WebConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        request_timeout_secs: 30,
        public_rate_limit: 1000,
        trust_forwarded_headers: false,
    }
}

pub fn date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 8, 30, 0).unwrap()
}

/// Create a test app with a no-op sync engine.
pub async fn create_test_app() -> TestApp {
    create_test_app_with(Arc::new(NoopSyncEngine), create_test_config()).await
}

/// Create a test app with the given sync engine and web configuration.
pub async fn create_test_app_with(sync: Arc<dyn SyncEngine>, config: WebConfig) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let hasher = SecretHasher::new(HashParams::minimal()).expect("Failed to create hasher");

    let accounts = AccountRepository::new(db.pool());
    let alice = accounts
        .create(
            &NewAccount::new(1, ALICE_EMAIL, ALICE_SECRET, "Alice").with_provider("gmail"),
            &hasher,
        )
        .await
        .expect("Failed to create alice");
    let bob = accounts
        .create(&NewAccount::new(2, BOB_EMAIL, BOB_SECRET, "Bob"), &hasher)
        .await
        .expect("Failed to create bob");

    let alice_inbox = FolderRepository::new(db.pool())
        .create(alice.id, "INBOX")
        .await
        .expect("Failed to create folder")
        .id;

    let messages = MessageRepository::new(db.pool());
    let mut alice_messages = Vec::new();
    for (day, subject, body) in [
        (1, "Quarterly report", "Numbers are attached."),
        (2, "Lunch plans", "Tacos on Friday?"),
        (3, "Invoice 42", "Please pay the invoice by the end of the month."),
    ] {
        let mut new_message = NewMessage::new(alice.id, subject, "sender@example.com", date(day))
            .with_message_id(format!("<alice-{day}@example.com>"))
            .with_to(ALICE_EMAIL)
            .with_text_body(body);
        if day != 2 {
            new_message = new_message.in_folder(alice_inbox);
        }
        alice_messages.push(messages.create(&new_message).await.expect("Failed to seed"));
    }

    let bob_messages = vec![messages
        .create(
            &NewMessage::new(bob.id, "Bob's private note", "boss@example.com", date(2))
                .with_to(BOB_EMAIL)
                .with_text_body("Confidential")
                .with_html_body("<p>Confidential</p>"),
        )
        .await
        .expect("Failed to seed")];

    let store = SqliteAccountStore::new(db.pool().clone(), &hasher).expect("Failed to create store");
    let lookup = MailLookupService::new(
        CredentialAuthenticator::new(Arc::new(store)),
        Arc::new(SqliteEmailQueryService::new(db.pool().clone())),
        sync,
        QueryLimits::default(),
    );

    let router = create_app(
        Arc::new(AppState::new(lookup)),
        Arc::new(RateLimitState::from_config(&config)),
        &config,
    );
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        alice,
        bob,
        alice_messages,
        bob_messages,
        alice_inbox,
    }
}

/// Credential body for Alice, extended with `extra` fields.
pub fn alice_body(extra: Value) -> Value {
    with_credential(ALICE_EMAIL, ALICE_SECRET, extra)
}

/// Credential body for Bob, extended with `extra` fields.
pub fn bob_body(extra: Value) -> Value {
    with_credential(BOB_EMAIL, BOB_SECRET, extra)
}

pub fn with_credential(email: &str, secret: &str, extra: Value) -> Value {
    let mut body = json!({ "email": email, "password": secret });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            body.insert(k.clone(), v.clone());
        }
    }
    body
}

/// IDs of the listed emails, in response order.
pub fn listed_ids(body: &Value) -> Vec<i64> {
    body["data"]["emails"]
        .as_array()
        .map(|emails| emails.iter().filter_map(|e| e["id"].as_i64()).collect())
        .unwrap_or_default()
}
