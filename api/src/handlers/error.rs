//! Maps domain errors to HTTP responses.
//!
//! The mapping is deliberately lossy. `SessionInvalid` covers a session
//! that expired, never existed, was already consumed or belongs to the
//! other flow, and all four produce an identical body; the true cause is
//! only in the server logs. Backend failures collapse to an opaque 500.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use validator::ValidationErrors;

use cg_core::errors::OtpError;
use cg_shared::types::response::ErrorBody;

/// Stable error code and status for each domain error
fn classify(err: &OtpError) -> (StatusCode, &'static str, String) {
    match err {
        OtpError::Validation { field } => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Invalid value for field: {}", field),
        ),
        OtpError::Unauthenticated => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHENTICATED",
            "Authentication required".to_string(),
        ),
        OtpError::Forbidden => (
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "Session does not belong to the caller".to_string(),
        ),
        OtpError::SessionInvalid => (
            StatusCode::BAD_REQUEST,
            "SESSION_INVALID",
            "Invalid or expired verification session".to_string(),
        ),
        OtpError::CodeMismatch => (
            StatusCode::BAD_REQUEST,
            "CODE_MISMATCH",
            "Incorrect verification code".to_string(),
        ),
        OtpError::TooManyAttempts => (
            StatusCode::TOO_MANY_REQUESTS,
            "TOO_MANY_ATTEMPTS",
            "Too many attempts, request a new code".to_string(),
        ),
        OtpError::Store(_) | OtpError::Identity(_) | OtpError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error".to_string(),
        ),
    }
}

/// Build the HTTP response for a domain error
pub fn to_response(err: &OtpError) -> HttpResponse {
    let (status, code, message) = classify(err);

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        // Detail stays server-side
        log::error!("Request failed: {}", err);
    }

    HttpResponse::build(status).json(ErrorBody::new(code, message))
}

/// Build the HTTP response for DTO validation failures
///
/// Lists the offending field names; messages stay generic.
pub fn validation_failure(errors: &ValidationErrors) -> HttpResponse {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|k| k.to_string())
        .collect();
    fields.sort();

    log::warn!("Request validation failed: {:?}", fields);

    HttpResponse::BadRequest().json(
        ErrorBody::new("VALIDATION_ERROR", "Invalid request data").with_fields(fields),
    )
}
