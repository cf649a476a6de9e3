//! Handler for `POST /api/v1/otp/verify`.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cg_core::errors::OtpError;
use cg_core::repositories::session::SessionStore;
use cg_core::services::identity::{IdentityBinder, IdentityProvider};
use cg_core::services::otp::Notifier;
use cg_shared::types::response::OkBody;

use crate::dto::VerifyRequest;
use crate::handlers::error::{to_response, validation_failure};
use crate::state::AppState;

use super::{expired_cookie, session_handle, verify_error_response};

/// Verify an email-verification code
///
/// The handle comes from the session cookie; a missing cookie is
/// indistinguishable from a dead session. Success consumes the session,
/// marks the subject verified and clears the cookie.
pub async fn verify<S, N, P, B>(
    req: HttpRequest,
    state: web::Data<AppState<S, N, P, B>>,
    body: web::Json<VerifyRequest>,
) -> HttpResponse
where
    S: SessionStore + 'static,
    N: Notifier + 'static,
    P: IdentityProvider + 'static,
    B: IdentityBinder + 'static,
{
    if let Err(errors) = body.validate() {
        return validation_failure(&errors);
    }

    let subject_id = match state.provider.verify_caller_token(&body.caller_token).await {
        Ok(subject_id) => subject_id,
        Err(e) => return to_response(&e.into()),
    };

    let Some(handle) = session_handle(&req, &state.otp) else {
        return to_response(&OtpError::SessionInvalid);
    };

    match state
        .verifier
        .verify_email(&handle, &body.submitted_code, &subject_id)
        .await
    {
        Ok(()) => HttpResponse::Ok()
            .cookie(expired_cookie(&state.otp))
            .json(OkBody::new()),
        Err(e) => verify_error_response(&state.otp, &e),
    }
}
