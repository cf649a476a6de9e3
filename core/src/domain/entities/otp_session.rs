//! OTP session entity, the single persisted record of the verification core.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default maximum number of wrong-code submissions per session
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default session lifetime in seconds (10 minutes)
pub const DEFAULT_TTL_SECONDS: i64 = 600;

/// Flow a verification session belongs to
///
/// A code issued for one purpose can never be consumed by the other: the
/// purpose is part of the lookup policy, and sweeps are scoped per purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Confirm ownership of the account's email address
    EmailVerification,
    /// Prove possession of the mailbox before rotating the password
    PasswordReset,
}

impl OtpPurpose {
    /// Stable string form used for persistence
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::EmailVerification => "email_verification",
            OtpPurpose::PasswordReset => "password_reset",
        }
    }
}

impl FromStr for OtpPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email_verification" => Ok(OtpPurpose::EmailVerification),
            "password_reset" => Ok(OtpPurpose::PasswordReset),
            other => Err(format!("Unknown OTP purpose: {}", other)),
        }
    }
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A server-side verification session
///
/// Created only by the code issuer, mutated only by the verifier's
/// attempt-increment path, and physically deleted on consumption,
/// exhaustion, lazy expiry detection, or supersession. The plaintext
/// code never appears here; only its salted hash is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpSession {
    /// Opaque, cryptographically random handle; primary lookup key,
    /// carried by the caller in an HttpOnly cookie
    pub handle: String,

    /// Principal the code was issued for
    pub subject_id: String,

    /// Address the code was sent to; used only for masked logging
    pub destination: String,

    /// Flow this session belongs to
    pub purpose: OtpPurpose,

    /// Hex SHA-256 of `salt + code`
    pub code_hash: String,

    /// Per-session random salt, hex-encoded
    pub salt: String,

    /// Number of wrong-code submissions so far
    pub attempts: u32,

    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// User-Agent of the issuing request, kept for audit logs
    pub user_agent: Option<String>,
}

impl OtpSession {
    /// Create a new session starting at `now` with the given lifetime
    ///
    /// Handle, salt and code hash are produced by the issuer; the entity
    /// only assembles the record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        handle: String,
        subject_id: String,
        destination: String,
        purpose: OtpPurpose,
        code_hash: String,
        salt: String,
        now: DateTime<Utc>,
        ttl_seconds: i64,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            handle,
            subject_id,
            destination,
            purpose,
            code_hash,
            salt,
            attempts: 0,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
            user_agent,
        }
    }

    /// Whether the session has expired as of `now`
    ///
    /// Expiry is detected lazily on access; there is no background sweep.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the attempt budget is already spent
    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at(now: DateTime<Utc>, ttl: i64) -> OtpSession {
        OtpSession::new(
            "handle-1".to_string(),
            "u1".to_string(),
            "seller@example.com".to_string(),
            OtpPurpose::EmailVerification,
            "hash".to_string(),
            "salt".to_string(),
            now,
            ttl,
            Some("test-agent".to_string()),
        )
    }

    #[test]
    fn test_new_session() {
        let now = Utc::now();
        let session = session_at(now, DEFAULT_TTL_SECONDS);

        assert_eq!(session.attempts, 0);
        assert_eq!(session.created_at, now);
        assert_eq!(session.expires_at, now + Duration::seconds(600));
        assert!(!session.is_expired(now));
        assert!(!session.is_exhausted(DEFAULT_MAX_ATTEMPTS));
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let session = session_at(now, 600);

        // Exactly at the boundary the code is still accepted
        assert!(!session.is_expired(now + Duration::seconds(600)));
        assert!(session.is_expired(now + Duration::seconds(601)));
    }

    #[test]
    fn test_exhaustion() {
        let now = Utc::now();
        let mut session = session_at(now, 600);

        session.attempts = 4;
        assert!(!session.is_exhausted(5));
        session.attempts = 5;
        assert!(session.is_exhausted(5));
    }

    #[test]
    fn test_purpose_round_trip() {
        for purpose in [OtpPurpose::EmailVerification, OtpPurpose::PasswordReset] {
            assert_eq!(purpose.as_str().parse::<OtpPurpose>().unwrap(), purpose);
        }
        assert!("phone_verification".parse::<OtpPurpose>().is_err());
    }

    #[test]
    fn test_serialization() {
        let session = session_at(Utc::now(), 600);
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains(r#""purpose":"email_verification""#));

        let deserialized: OtpSession = serde_json::from_str(&json).unwrap();
        assert_eq!(session, deserialized);
    }
}
