//! Error-to-HTTP mapping.

pub mod error;

pub use error::{to_response, validation_failure};
