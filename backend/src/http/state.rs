//! Application state for the HTTP server.

use std::sync::Arc;
use tracing::{error, info};

use crate::io::{DataSource, Dataset, DatasetCache};
use crate::models::Record;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-only dataset shared by every request
    pub dataset: Arc<Dataset>,
    /// Set when the data source could not be loaded; the API then serves "no data"
    pub load_error: Option<String>,
}

impl AppState {
    /// Create a new application state around a loaded dataset.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            load_error: None,
        }
    }

    /// State for a source that failed to load.
    pub fn unavailable(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            dataset: Arc::new(Dataset::empty(source_id)),
            load_error: Some(message.into()),
        }
    }

    /// Load `source` through `cache`. A failure is logged and turned into an
    /// empty, disabled state rather than aborting startup.
    pub fn from_source(source: &dyn DataSource, cache: &DatasetCache) -> Self {
        match cache.get_or_load(source) {
            Ok(dataset) => {
                info!(source = %dataset.source_id, records = dataset.len(), "dataset ready");
                Self::new(dataset)
            }
            Err(e) => {
                error!(source = %source.source_id(), error = %e, "unable to load data");
                Self::unavailable(source.source_id(), format!("Unable to load data: {}", e))
            }
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.dataset.records
    }

    pub fn is_available(&self) -> bool {
        self.load_error.is_none()
    }
}
