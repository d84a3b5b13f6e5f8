//! Application state for the rate engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::grid::GridSource;
use crate::reload::ReloadController;

/// Shared application state.
///
/// Holds the controller owning the published rate table and the source
/// that `POST /reload` reads from.
#[derive(Clone)]
pub struct AppState {
    controller: Arc<ReloadController>,
    source: Arc<dyn GridSource>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(controller: Arc<ReloadController>, source: Arc<dyn GridSource>) -> Self {
        Self { controller, source }
    }

    /// Returns the reload controller.
    pub fn controller(&self) -> &ReloadController {
        &self.controller
    }

    /// Returns the configured rate chart source.
    pub fn source(&self) -> Arc<dyn GridSource> {
        Arc::clone(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
