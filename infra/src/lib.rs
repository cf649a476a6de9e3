//! # CodeGate Infrastructure
//!
//! Concrete implementations of the core's external seams:
//! - MySQL-backed session store (`sqlx`)
//! - SMTP notifier (`lettre`) and a console mock for development
//! - HTTP identity provider client (`reqwest`)

pub mod database;
pub mod email;
pub mod identity;

pub use database::{create_pool, MySqlSessionStore};
pub use email::{MockNotifier, SmtpNotifier};
pub use identity::HttpIdentityProvider;
