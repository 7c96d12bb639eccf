use std::sync::Arc;

use crate::config::Config;
use crate::crypto::signature::Signer;
use crate::store::session::SessionStore;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<Config>,
    /// Signs outgoing payment requests.
    pub signer: Signer,
    /// The checkout sessions awaiting their redirect.
    pub sessions: SessionStore,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    pub fn new(config: &Config) -> Self {
        let signer = Signer::new(config.api_key.clone(), config.merchant_id.clone());
        tracing::info!("✅ Signer initialized for merchant {}", config.merchant_id);

        let sessions = SessionStore::new(config.session_ttl);
        tracing::info!(
            "✅ Session store initialized (TTL {}s)",
            config.session_ttl.as_secs()
        );

        AppState {
            config: Arc::new(config.clone()),
            signer,
            sessions,
        }
    }
}
