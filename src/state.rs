use crate::config::Config;
use crate::store::ProductStore;
use std::sync::Arc;

/// Shared application state
///
/// Built once at startup; axum clones it into each request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProductStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
