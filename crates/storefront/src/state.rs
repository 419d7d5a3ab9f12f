//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::kitchen::{ApiError, KitchenClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the kitchen API client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    kitchen: KitchenClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the kitchen API client can't be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let kitchen = KitchenClient::new(&config.kitchen)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, kitchen }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the kitchen API client.
    #[must_use]
    pub fn kitchen(&self) -> &KitchenClient {
        &self.inner.kitchen
    }
}
