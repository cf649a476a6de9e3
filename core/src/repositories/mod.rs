//! Repository interfaces and always-available in-memory implementations.

pub mod session;

pub use session::{AttemptOutcome, InMemorySessionStore, SessionStore};
