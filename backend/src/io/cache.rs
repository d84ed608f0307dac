//! Process-wide memoization of loaded datasets.
//!
//! A dataset is loaded once per source identity and shared as an
//! `Arc<Dataset>` until it is explicitly invalidated or the source's content
//! checksum changes. Failed loads are never cached.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

use super::loaders::{DataSource, Dataset, LoadError};

/// Cache of datasets keyed by [`DataSource::source_id`].
#[derive(Clone, Default)]
pub struct DatasetCache {
    entries: Arc<RwLock<HashMap<String, Arc<Dataset>>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `source`, loading it on first use.
    pub fn get_or_load(&self, source: &dyn DataSource) -> Result<Arc<Dataset>, LoadError> {
        let source_id = source.source_id();
        if let Some(dataset) = self.entries.read().get(&source_id) {
            debug!(source = %source_id, "dataset cache hit");
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(source.load()?);
        let mut entries = self.entries.write();
        // Another caller may have loaded it while we were reading the file.
        let cached = entries
            .entry(source_id)
            .or_insert_with(|| Arc::clone(&dataset));
        Ok(Arc::clone(cached))
    }

    /// Reload `source` if its checksum no longer matches the cached copy.
    ///
    /// Returns `true` when a reload happened.
    pub fn refresh_if_changed(&self, source: &dyn DataSource) -> Result<bool, LoadError> {
        let source_id = source.source_id();
        let cached_checksum = self
            .entries
            .read()
            .get(&source_id)
            .map(|dataset| dataset.checksum.clone());

        let Some(cached_checksum) = cached_checksum else {
            self.get_or_load(source)?;
            return Ok(true);
        };

        if source.checksum()? == cached_checksum {
            return Ok(false);
        }

        info!(source = %source_id, "source changed, reloading dataset");
        let dataset = Arc::new(source.load()?);
        self.entries.write().insert(source_id, dataset);
        Ok(true)
    }

    pub fn get(&self, source_id: &str) -> Option<Arc<Dataset>> {
        self.entries.read().get(source_id).cloned()
    }

    /// Drop one cached dataset. Returns `true` if it was present.
    pub fn invalidate(&self, source_id: &str) -> bool {
        self.entries.write().remove(source_id).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

static GLOBAL_CACHE: OnceLock<DatasetCache> = OnceLock::new();

/// The process-wide cache.
pub fn global_cache() -> &'static DatasetCache {
    GLOBAL_CACHE.get_or_init(DatasetCache::new)
}
