//! # CodeGate Core
//!
//! Core business logic and domain layer for the CodeGate OTP verification
//! service. This crate contains the session entity, the session store
//! interface, the OTP services (issuing, verification, sweeping), the
//! external seams (notifier, identity provider) and the error taxonomy.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
