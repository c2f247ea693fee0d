//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;

use super::handlers::{
    get_email_detail, list_emails, sync_and_list_emails, verify_credential, AppState,
};
use super::middleware::{create_cors_layer, public_rate_limit, RateLimitState};
use super::openapi::ApiDoc;
use crate::config::WebConfig;

/// Create the public API router.
pub fn create_router(
    app_state: Arc<AppState>,
    rate_limit: Arc<RateLimitState>,
    web_config: &WebConfig,
) -> Router {
    let public_routes = Router::new()
        .route("/verify", post(verify_credential))
        .route("/list", post(list_emails))
        .route("/sync-and-list", post(sync_and_list_emails))
        .route("/detail", post(get_email_detail))
        .layer(middleware::from_fn(move |req, next| {
            let state = rate_limit.clone();
            public_rate_limit(state, req, next)
        }));

    Router::new()
        .nest("/api/public/emails", public_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    web_config.request_timeout_secs,
                )))
                .layer(create_cors_layer(&web_config.cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the router serving the OpenAPI document.
pub fn create_openapi_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

/// Create the complete application: API, health check and OpenAPI document.
pub fn create_app(
    app_state: Arc<AppState>,
    rate_limit: Arc<RateLimitState>,
    web_config: &WebConfig,
) -> Router {
    create_router(app_state, rate_limit, web_config)
        .merge(create_health_router())
        .merge(create_openapi_router())
        .layer(CompressionLayer::new())
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// OpenAPI document handler.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_router() {
        let resp = create_health_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_router() {
        let resp = create_openapi_router()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
