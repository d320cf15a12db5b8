use std::path::Path;
use std::sync::{Arc, OnceLock};

use super::error::DataSourceError;
use super::loader::load_dataset;
use super::model::EnrollmentDataset;

/// Process-wide dataset slot. The first successful load wins and is never
/// replaced; every caller gets a handle to the same immutable dataset.
pub static SESSION: DatasetCache = DatasetCache::new();

/// Memoizes one load. Failures are not cached, so a later call retries.
pub struct DatasetCache {
    slot: OnceLock<Arc<EnrollmentDataset>>,
}

impl DatasetCache {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Return the cached dataset, loading it from `path` on first use.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<EnrollmentDataset>, DataSourceError> {
        self.get_or_try_init(|| load_dataset(path))
    }

    pub fn get_or_try_init(
        &self,
        load: impl FnOnce() -> Result<EnrollmentDataset, DataSourceError>,
    ) -> Result<Arc<EnrollmentDataset>, DataSourceError> {
        if let Some(ds) = self.slot.get() {
            log::debug!("platform data served from cache");
            return Ok(Arc::clone(ds));
        }
        let loaded = Arc::new(load()?);
        Ok(Arc::clone(self.slot.get_or_init(|| loaded)))
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}
