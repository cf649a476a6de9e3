//! Request DTOs for code issuance and verification.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

static CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").unwrap());

/// Body for `POST /api/v1/otp/start`
#[derive(Debug, Deserialize, Validate)]
pub struct StartRequest {
    /// Token proving the caller's identity
    #[validate(length(min = 1, message = "caller token is required"))]
    pub caller_token: String,

    /// Email address the code is delivered to
    #[validate(email(message = "destination must be a valid email address"))]
    pub destination: String,
}

/// Body for `POST /api/v1/otp/verify`
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    /// Token proving the caller's identity
    #[validate(length(min = 1, message = "caller token is required"))]
    pub caller_token: String,

    /// The 6-digit code the caller received
    #[validate(regex(path = "CODE_REGEX", message = "code must be exactly 6 digits"))]
    pub submitted_code: String,
}

/// Body for `POST /api/v1/otp/reset/start`
#[derive(Debug, Deserialize, Validate)]
pub struct ResetStartRequest {
    /// Email address of the account to reset
    #[validate(email(message = "destination must be a valid email address"))]
    pub destination: String,
}

/// Body for `POST /api/v1/otp/reset/verify`
#[derive(Debug, Deserialize, Validate)]
pub struct ResetVerifyRequest {
    /// The 6-digit code the caller received
    #[validate(regex(path = "CODE_REGEX", message = "code must be exactly 6 digits"))]
    pub submitted_code: String,

    /// Replacement password
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_request_rejects_bad_email() {
        let req = StartRequest {
            caller_token: "token".to_string(),
            destination: "not-an-email".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_verify_request_rejects_short_code() {
        let req = VerifyRequest {
            caller_token: "token".to_string(),
            submitted_code: "123".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_verify_request_rejects_non_digits() {
        let req = VerifyRequest {
            caller_token: "token".to_string(),
            submitted_code: "12a456".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_verify_request_accepts_leading_zeros() {
        let req = VerifyRequest {
            caller_token: "token".to_string(),
            submitted_code: "000123".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_reset_verify_rejects_short_password() {
        let req = ResetVerifyRequest {
            submitted_code: "123456".to_string(),
            new_password: "short".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
