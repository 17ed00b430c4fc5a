//! Application state for the rates API.
//!
//! Shared state available to all request handlers: the contract store and
//! the server configuration.

use std::sync::Arc;

use calc_store::RateStore;

use crate::config::ServerConfig;

/// Shared application state for the rates API.
///
/// # Type Parameters
///
/// * `S` - The contract store type (must implement [`RateStore`])
pub struct AppState<S> {
    /// The contract store.
    store: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S lives behind an Arc and doesn't need to
// be Clone itself.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: RateStore> AppState<S> {
    /// Creates a new AppState with the given store and configuration.
    pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the contract store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the base URL used to build pagination links.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the default page size for rate listings.
    pub fn default_page_size(&self) -> usize {
        self.config.default_page_size
    }

    /// Returns the maximum page size for rate listings.
    pub fn max_page_size(&self) -> usize {
        self.config.max_page_size
    }
}
