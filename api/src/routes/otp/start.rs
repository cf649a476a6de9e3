//! Handler for `POST /api/v1/otp/start`.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use cg_core::domain::entities::otp_session::OtpPurpose;
use cg_core::repositories::session::SessionStore;
use cg_core::services::identity::{IdentityBinder, IdentityProvider};
use cg_core::services::otp::Notifier;
use cg_shared::types::response::OkBody;
use cg_shared::utils::email::normalize_email;

use crate::dto::StartRequest;
use crate::handlers::error::{to_response, validation_failure};
use crate::state::AppState;

use super::{session_cookie, user_agent};

/// Issue an email-verification code for an authenticated caller
///
/// The caller token is resolved to a subject first; issuance supersedes
/// any code the subject already holds for this purpose. The response body
/// carries no handle, only the cookie does.
pub async fn start<S, N, P, B>(
    req: HttpRequest,
    state: web::Data<AppState<S, N, P, B>>,
    body: web::Json<StartRequest>,
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

    let destination = normalize_email(&body.destination);
    match state
        .issuer
        .issue(
            &subject_id,
            &destination,
            OtpPurpose::EmailVerification,
            user_agent(&req),
        )
        .await
    {
        Ok(issued) => HttpResponse::Ok()
            .cookie(session_cookie(&state.otp, issued.handle))
            .json(OkBody::new()),
        Err(e) => to_response(&e),
    }
}
