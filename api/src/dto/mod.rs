//! Request payloads for the OTP endpoints.

pub mod otp;

pub use otp::{ResetStartRequest, ResetVerifyRequest, StartRequest, VerifyRequest};
