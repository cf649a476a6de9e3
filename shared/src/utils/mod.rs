//! Utility functions shared across crates

pub mod email;

pub use email::{mask_email, normalize_email};
