//! Shared application state and service wiring.

use std::sync::Arc;

use cg_core::services::identity::{IdentityBinder, IdentityProvider, ProviderIdentityBinder};
use cg_core::services::otp::{
    Clock, CodeHasher, CodeIssuer, Notifier, OtpServiceConfig, SessionSweeper, Sha256CodeHasher,
    SystemClock, Verifier,
};
use cg_core::repositories::session::SessionStore;
use cg_shared::config::OtpConfig;

/// Shared services handed to every handler
pub struct AppState<S, N, P, B>
where
    S: SessionStore,
    N: Notifier,
    P: IdentityProvider,
    B: IdentityBinder,
{
    pub issuer: Arc<CodeIssuer<S, N>>,
    pub verifier: Arc<Verifier<S, B>>,
    pub provider: Arc<P>,
    pub otp: OtpConfig,
}

/// Wire the issuer and verifier over a store, notifier and provider
///
/// The binder is derived from the provider, and both services share one
/// sweeper, hasher and clock.
pub fn build_state<S, N, P>(
    store: Arc<S>,
    notifier: Arc<N>,
    provider: Arc<P>,
    otp: OtpConfig,
) -> AppState<S, N, P, ProviderIdentityBinder<P>>
where
    S: SessionStore,
    N: Notifier + 'static,
    P: IdentityProvider,
{
    let service_config = OtpServiceConfig {
        ttl_seconds: otp.ttl_seconds,
        max_attempts: otp.max_attempts,
        sweep_batch_size: otp.sweep_batch_size,
    };
    let sweeper = Arc::new(SessionSweeper::new(
        store.clone(),
        service_config.sweep_batch_size,
    ));
    let hasher: Arc<dyn CodeHasher> = Arc::new(Sha256CodeHasher);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let binder = Arc::new(ProviderIdentityBinder::new(provider.clone()));

    AppState {
        issuer: Arc::new(CodeIssuer::new(
            store.clone(),
            notifier,
            sweeper.clone(),
            hasher.clone(),
            clock.clone(),
            service_config.clone(),
        )),
        verifier: Arc::new(Verifier::new(
            store,
            sweeper,
            binder,
            hasher,
            clock,
            service_config,
        )),
        provider,
        otp,
    }
}
