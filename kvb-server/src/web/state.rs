//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedKvbClient;
use crate::scrape::{KvbClient, PageSource};

/// Shared application state.
pub struct AppState<S = KvbClient> {
    /// Cached KVB scraper
    pub kvb: Arc<CachedKvbClient<S>>,

    /// Debug mode (short CORS preflight caching)
    pub debug: bool,
}

impl<S: PageSource> AppState<S> {
    /// Create a new app state.
    pub fn new(kvb: CachedKvbClient<S>, debug: bool) -> Self {
        Self {
            kvb: Arc::new(kvb),
            debug,
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            kvb: Arc::clone(&self.kvb),
            debug: self.debug,
        }
    }
}
