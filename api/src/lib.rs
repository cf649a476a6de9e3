//! HTTP layer for the CodeGate OTP verification service.
//!
//! Thin by design: handlers validate input, resolve the caller, move the
//! session handle between the cookie and the service layer, and map
//! domain errors to HTTP responses. All verification policy lives in
//! `cg_core`.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use state::{build_state, AppState};
