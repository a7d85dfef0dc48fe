//! Session-scoped dataset cache.
//!
//! One interactive session works against a single uploaded workbook; loading
//! it is the only expensive step, so the session owns a single-entry cache
//! keyed by the content of the source. Re-reading the same content is a hit;
//! any new content replaces the entry wholesale. There is no partial
//! invalidation and no eviction policy beyond replacement.

use std::fs;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::io::excel_read::load_workbook;
use crate::model::Dataset;

/// Explicit single-entry cache for the loaded dataset. The cached dataset is
/// immutable once produced and safe to reuse across matching and aggregation
/// calls within the session; the session is single-threaded by design.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<(u64, Dataset)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dataset for the workbook at `path`, loading it only when
    /// the source content differs from the cached entry.
    /// A failed load leaves any previously cached entry in place.
    pub fn load(&mut self, path: &Path) -> Result<&Dataset> {
        let key = fingerprint_file(path)?;
        match self.entry.take() {
            Some((cached, dataset)) if cached == key => {
                debug!(key, "dataset cache hit");
                let (_, dataset) = self.entry.insert((cached, dataset));
                Ok(dataset)
            }
            previous => {
                debug!(key, "dataset cache miss; loading workbook");
                let report = match load_workbook(path) {
                    Ok(report) => report,
                    Err(error) => {
                        self.entry = previous;
                        return Err(error);
                    }
                };
                let (_, dataset) = self.entry.insert((key, report.dataset));
                Ok(dataset)
            }
        }
    }

    /// Drops the cached entry, if any.
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// The currently cached dataset, without touching the source.
    pub fn cached(&self) -> Option<&Dataset> {
        self.entry.as_ref().map(|(_, dataset)| dataset)
    }
}

/// Content fingerprint of the source file.
fn fingerprint_file(path: &Path) -> Result<u64> {
    let bytes = fs::read(path)?;
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    Ok(hasher.finish())
}
