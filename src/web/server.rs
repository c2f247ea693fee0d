//! Web server for mailgate.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::WebConfig;
use crate::{MailGateError, Result};

use super::handlers::AppState;
use super::middleware::RateLimitState;
use super::router::create_app;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Per-IP rate limiters for the public endpoints.
    rate_limit: Arc<RateLimitState>,
    /// Web configuration.
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &WebConfig, app_state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| {
                MailGateError::Config(format!(
                    "invalid web server address {}:{}: {}",
                    config.host, config.port, e
                ))
            })?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            rate_limit: Arc::new(RateLimitState::from_config(config)),
            web_config: config.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> Router {
        create_app(
            self.app_state.clone(),
            self.rate_limit.clone(),
            &self.web_config,
        )
    }

    /// Bind the listener and start background tasks.
    async fn bind(&self) -> std::result::Result<(TcpListener, SocketAddr), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        // Start rate limiter cleanup after successful bind
        self.rate_limit.clone().start_cleanup_task();

        tracing::info!("Web server listening on http://{}", local_addr);
        Ok((listener, local_addr))
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.build_router();
        let (listener, _) = self.bind().await?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.build_router();
        let (listener, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::SqliteAccountStore;
    use crate::auth::{CredentialAuthenticator, HashParams, SecretHasher};
    use crate::db::Database;
    use crate::lookup::MailLookupService;
    use crate::mail::{QueryLimits, SqliteEmailQueryService};
    use crate::sync::NoopSyncEngine;

    fn create_test_config() -> WebConfig {
        WebConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Use random port
            cors_origins: vec![],
            request_timeout_secs: 30,
            public_rate_limit: 30,
            trust_forwarded_headers: false,
        }
    }

    async fn create_state() -> AppState {
        let db = Database::open_in_memory().await.unwrap();
        let hasher = SecretHasher::new(HashParams::minimal()).unwrap();
        let store = SqliteAccountStore::new(db.pool().clone(), &hasher).unwrap();
        AppState::new(MailLookupService::new(
            CredentialAuthenticator::new(Arc::new(store)),
            Arc::new(SqliteEmailQueryService::new(db.pool().clone())),
            Arc::new(NoopSyncEngine),
            QueryLimits::default(),
        ))
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let server = WebServer::new(&create_test_config(), create_state().await).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_invalid_addr() {
        let config = WebConfig {
            host: "not a host".to_string(),
            ..create_test_config()
        };
        let result = WebServer::new(&config, create_state().await);
        assert!(matches!(result, Err(MailGateError::Config(_))));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let server = WebServer::new(&create_test_config(), create_state().await).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");
    }
}
