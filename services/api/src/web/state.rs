//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use backoffice_core::ports::{BackendService, Clock, SystemClock};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Holds no per-user data: stores are built per request and the caller's session
/// arrives as a request extension.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BackendService>,
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(backend: Arc<dyn BackendService>, config: Arc<Config>) -> Self {
        Self {
            backend,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
