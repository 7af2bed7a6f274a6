//! Application state for the attendance API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::engine::{PunchProcessor, TracingAlertSink};
use crate::storage::{AttendanceStore, InMemoryStore};

/// Shared application state.
///
/// Holds the attendance store and the punch processor built on top of it.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn AttendanceStore>,
    processor: Arc<PunchProcessor>,
}

impl AppState {
    /// Creates the state for a loaded configuration, backed by an in-memory
    /// store seeded with the configured roster and approvals.
    pub fn new(config: ConfigLoader) -> Self {
        let store: Arc<dyn AttendanceStore> = Arc::new(InMemoryStore::from_config(config.config()));
        let processor = PunchProcessor::new(
            Arc::clone(&store),
            Arc::new(TracingAlertSink),
            config.settings().clone(),
        );
        Self::from_parts(store, processor)
    }

    /// Creates the state from an existing store and processor.
    ///
    /// The processor should write to the same store.
    pub fn from_parts(store: Arc<dyn AttendanceStore>, processor: PunchProcessor) -> Self {
        Self {
            store,
            processor: Arc::new(processor),
        }
    }

    /// Returns the attendance store.
    pub fn store(&self) -> Arc<dyn AttendanceStore> {
        Arc::clone(&self.store)
    }

    /// Returns the punch processor.
    pub fn processor(&self) -> Arc<PunchProcessor> {
        Arc::clone(&self.processor)
    }
}
