//! Handler for `POST /api/v1/otp/reset/verify`.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cg_core::errors::OtpError;
use cg_core::repositories::session::SessionStore;
use cg_core::services::identity::{IdentityBinder, IdentityProvider};
use cg_core::services::otp::Notifier;
use cg_shared::types::response::OkBody;

use crate::dto::ResetVerifyRequest;
use crate::handlers::error::{to_response, validation_failure};
use crate::state::AppState;

use super::{expired_cookie, session_handle, verify_error_response};

/// Complete a password reset
///
/// Unauthenticated: possession of the cookie handle plus the emailed
/// code is the proof of mailbox ownership. Success rotates the password
/// and clears the cookie. A decoy handle from `reset/start` dies here
/// with the same error as any dead session.
pub async fn reset_verify<S, N, P, B>(
    req: HttpRequest,
    state: web::Data<AppState<S, N, P, B>>,
    body: web::Json<ResetVerifyRequest>,
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

    let Some(handle) = session_handle(&req, &state.otp) else {
        return to_response(&OtpError::SessionInvalid);
    };

    match state
        .verifier
        .verify_reset(&handle, &body.submitted_code, &body.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok()
            .cookie(expired_cookie(&state.otp))
            .json(OkBody::new()),
        Err(e) => verify_error_response(&state.otp, &e),
    }
}
