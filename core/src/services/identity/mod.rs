//! Identity seams: the external provider interface and the binder adapter
//! the verifier drives after a successful code match.

mod binder;
mod traits;

pub use binder::ProviderIdentityBinder;
pub use traits::{IdentityBinder, IdentityProvider};
