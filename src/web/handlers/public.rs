//! Public email lookup handlers.
//!
//! Each request carries the account email and secret in its JSON body; there
//! is no session.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::web::dto::{
    ApiResponse, DetailRequest, EmailDetailResponse, EmailListResponse, ListRequest,
    SyncAndListRequest, ValidatedJson, VerifyRequest, VerifyResponse,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;

/// POST /api/public/emails/verify - Check an email/password pair.
#[utoipa::path(
    post,
    path = "/api/public/emails/verify",
    tag = "public",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Credential is valid", body = VerifyResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn verify_credential(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<VerifyRequest>,
) -> Result<Json<ApiResponse<VerifyResponse>>, ApiError> {
    let account = state
        .lookup
        .verify_credential(&req.email, &req.password)
        .await?;

    Ok(Json(ApiResponse::new(VerifyResponse::from(account))))
}

/// POST /api/public/emails/list - List stored messages.
#[utoipa::path(
    post,
    path = "/api/public/emails/list",
    tag = "public",
    request_body = ListRequest,
    responses(
        (status = 200, description = "One page of messages", body = EmailListResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Failed to get emails", body = ErrorBody)
    )
)]
pub async fn list_emails(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ListRequest>,
) -> Result<Json<ApiResponse<EmailListResponse>>, ApiError> {
    let page = state
        .lookup
        .list_messages(&req.email, &req.password, &req.to_raw_query())
        .await?;

    Ok(Json(ApiResponse::new(EmailListResponse::from(page))))
}

/// POST /api/public/emails/sync-and-list - Sync the mailbox, then list messages.
#[utoipa::path(
    post,
    path = "/api/public/emails/sync-and-list",
    tag = "public",
    request_body = SyncAndListRequest,
    responses(
        (status = 200, description = "One page of messages", body = EmailListResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Failed to get emails", body = ErrorBody)
    )
)]
pub async fn sync_and_list_emails(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SyncAndListRequest>,
) -> Result<Json<ApiResponse<EmailListResponse>>, ApiError> {
    let page = state
        .lookup
        .sync_and_list_messages(&req.email, &req.password, &req.to_raw_query())
        .await?;

    Ok(Json(ApiResponse::new(EmailListResponse::from(page))))
}

/// POST /api/public/emails/detail - Fetch one message.
#[utoipa::path(
    post,
    path = "/api/public/emails/detail",
    tag = "public",
    request_body = DetailRequest,
    responses(
        (status = 200, description = "The message", body = EmailDetailResponse),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 403, description = "Message belongs to another account", body = ErrorBody),
        (status = 404, description = "Message not found", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn get_email_detail(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<DetailRequest>,
) -> Result<Json<ApiResponse<EmailDetailResponse>>, ApiError> {
    let message = state
        .lookup
        .get_message_detail(&req.email, &req.password, req.email_id)
        .await?;

    Ok(Json(ApiResponse::new(EmailDetailResponse::from(message))))
}
