//! Handler for `POST /api/v1/otp/reset/start`.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cg_core::domain::entities::otp_session::OtpPurpose;
use cg_core::repositories::session::SessionStore;
use cg_core::services::identity::{IdentityBinder, IdentityProvider};
use cg_core::services::otp::{generate_handle, Notifier};
use cg_shared::types::response::OkBody;
use cg_shared::utils::email::{mask_email, normalize_email};

use crate::dto::ResetStartRequest;
use crate::handlers::error::{to_response, validation_failure};
use crate::state::AppState;

use super::{session_cookie, user_agent};

/// Begin a password reset for an unauthenticated caller
///
/// The response must not reveal whether the email has an account. A
/// known email gets a real session; an unknown one gets a decoy handle
/// that no store record backs, so any later verify fails with the same
/// generic error as an expired session. Status, body and cookie shape
/// are identical on both paths.
pub async fn reset_start<S, N, P, B>(
    req: HttpRequest,
    state: web::Data<AppState<S, N, P, B>>,
    body: web::Json<ResetStartRequest>,
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

    let destination = normalize_email(&body.destination);
    let handle = match state.provider.lookup_subject_by_email(&destination).await {
        Ok(Some(subject_id)) => {
            match state
                .issuer
                .issue(
                    &subject_id,
                    &destination,
                    OtpPurpose::PasswordReset,
                    user_agent(&req),
                )
                .await
            {
                Ok(issued) => issued.handle,
                Err(e) => return to_response(&e),
            }
        }
        Ok(None) => {
            log::info!(
                "Password reset requested for unknown email: {}",
                mask_email(&destination)
            );
            generate_handle()
        }
        Err(e) => return to_response(&e.into()),
    };

    HttpResponse::Ok()
        .cookie(session_cookie(&state.otp, handle))
        .json(OkBody::new())
}
