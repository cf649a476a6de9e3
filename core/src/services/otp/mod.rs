//! OTP service module
//!
//! This module provides the complete verification-session workflow:
//! - Code issuance with supersession of prior sessions
//! - Policy-enforcing verification (expiry, attempt budget, at-most-once
//!   consumption)
//! - Batched sweeping of a subject's sessions
//! - Injectable clock and hash function for deterministic tests

mod clock;
mod config;
mod hasher;
mod issuer;
mod sweeper;
mod traits;
mod types;
mod verifier;

#[cfg(test)]
mod tests;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;
pub use config::OtpServiceConfig;
pub use hasher::{CodeHasher, Sha256CodeHasher};
pub use issuer::{generate_handle, CodeIssuer};
pub use sweeper::SessionSweeper;
pub use traits::Notifier;
pub use types::IssuedCode;
pub use verifier::Verifier;
