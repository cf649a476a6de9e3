//! OTP endpoints and the cookie plumbing they share.
//!
//! The session handle never appears in a response body; it travels
//! exclusively in an HttpOnly cookie set on issuance and cleared when the
//! session dies.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};

use cg_core::errors::OtpError;
use cg_core::repositories::session::SessionStore;
use cg_core::services::identity::{IdentityBinder, IdentityProvider};
use cg_core::services::otp::Notifier;
use cg_shared::config::OtpConfig;

use crate::handlers::error::to_response;

mod reset_start;
mod reset_verify;
mod start;
mod verify;

pub use reset_start::reset_start;
pub use reset_verify::reset_verify;
pub use start::start;
pub use verify::verify;

/// Mount the OTP routes under the enclosing scope
pub fn configure<S, N, P, B>(cfg: &mut web::ServiceConfig)
where
    S: SessionStore + 'static,
    N: Notifier + 'static,
    P: IdentityProvider + 'static,
    B: IdentityBinder + 'static,
{
    cfg.service(
        web::scope("/otp")
            .route("/start", web::post().to(start::<S, N, P, B>))
            .route("/verify", web::post().to(verify::<S, N, P, B>))
            .route("/reset/start", web::post().to(reset_start::<S, N, P, B>))
            .route("/reset/verify", web::post().to(reset_verify::<S, N, P, B>)),
    );
}

/// Cookie carrying a freshly issued session handle
///
/// HttpOnly and SameSite=Lax always; Secure follows configuration so
/// local development over plain HTTP still works. Max-Age mirrors the
/// code TTL, but the server-side expiry check is what actually decides.
fn session_cookie(config: &OtpConfig, handle: String) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), handle)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .path("/")
        .max_age(Duration::seconds(config.ttl_seconds))
        .finish()
}

/// Cookie that removes the session handle from the browser
fn expired_cookie(config: &OtpConfig) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), "")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .path("/")
        .max_age(Duration::ZERO)
        .finish()
}

/// Error response for a verify endpoint
///
/// When the session is gone for good the cookie goes with it, so the
/// client cannot keep replaying a dead handle.
fn verify_error_response(config: &OtpConfig, err: &OtpError) -> HttpResponse {
    let mut resp = to_response(err);
    if matches!(err, OtpError::SessionInvalid | OtpError::TooManyAttempts) {
        if let Err(e) = resp.add_cookie(&expired_cookie(config)) {
            log::error!("Failed to attach cookie removal: {}", e);
        }
    }
    resp
}

/// Extract the session handle from the request cookie, if present
fn session_handle(req: &HttpRequest, config: &OtpConfig) -> Option<String> {
    req.cookie(&config.cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let config = OtpConfig::default();
        let cookie = session_cookie(&config, "abc123".to_string());

        assert_eq!(cookie.name(), "otp_sid");
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(600)));
    }

    #[test]
    fn test_secure_flag_follows_config() {
        let config = OtpConfig {
            cookie_secure: true,
            ..Default::default()
        };
        let cookie = session_cookie(&config, "abc123".to_string());
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_expired_cookie_clears_value() {
        let config = OtpConfig::default();
        let cookie = expired_cookie(&config);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
