//! OpenAPI document for the public endpoints.

use utoipa::OpenApi;

use super::dto::{
    DetailRequest, EmailDetailResponse, EmailListResponse, EmailSummaryResponse, ListRequest,
    SyncAndListRequest, VerifyRequest, VerifyResponse,
};
use super::error::{ErrorBody, ErrorCode, ErrorDetail};
use super::handlers;

/// OpenAPI description of the public email lookup API.
#[derive(OpenApi)]
#[openapi(
    info(title = "mailgate", description = "Credential-gated public email lookup"),
    paths(
        handlers::public::verify_credential,
        handlers::public::list_emails,
        handlers::public::sync_and_list_emails,
        handlers::public::get_email_detail,
    ),
    components(schemas(
        VerifyRequest,
        ListRequest,
        SyncAndListRequest,
        DetailRequest,
        VerifyResponse,
        EmailSummaryResponse,
        EmailListResponse,
        EmailDetailResponse,
        ErrorBody,
        ErrorDetail,
        ErrorCode,
    )),
    tags((name = "public", description = "Public email lookup"))
)]
pub struct ApiDoc;
