//! Identity provider implementations.

pub mod http;

pub use http::HttpIdentityProvider;
