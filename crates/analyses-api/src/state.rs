//! Application state for the analyses API

use std::sync::Arc;

use analyses_core::AnalysisStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Store handle, built once at startup
    store: Arc<dyn AnalysisStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn AnalysisStore>) -> Self {
        Self { store }
    }

    /// Get the store
    pub fn store(&self) -> &dyn AnalysisStore {
        self.store.as_ref()
    }
}
