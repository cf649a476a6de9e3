//! Business services for the OTP verification core.

pub mod identity;
pub mod otp;

pub use identity::{IdentityBinder, IdentityProvider, ProviderIdentityBinder};
pub use otp::{
    Clock, CodeHasher, CodeIssuer, IssuedCode, Notifier, OtpServiceConfig, SessionSweeper,
    Sha256CodeHasher, SystemClock, Verifier,
};
