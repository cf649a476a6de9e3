//! Route handlers and URL configuration.

pub mod health;
pub mod otp;
