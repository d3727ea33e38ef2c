//! Memoized pipeline results.
//!
//! The dashboard recomputes all three chart inputs on every filter change.
//! The cache keys results on (store generation, Filter Set), so output is
//! identical to calling [`compute`](super::compute) directly.

use std::collections::HashMap;

use super::{ChartInputs, compute};
use crate::charts::Palette;
use crate::filter::FilterSet;
use crate::store::RecordStore;

/// Default number of filter combinations kept per dataset.
pub const DEFAULT_CACHE_ENTRIES: usize = 64;

pub struct PipelineCache {
    generation: u64,
    entries: HashMap<FilterSet, ChartInputs>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl PipelineCache {
    /// Create a cache holding up to `capacity` filter combinations.
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            generation: 0,
            entries: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Return cached chart inputs, computing and storing them on a miss.
    ///
    /// Entries from an older store generation are dropped first. When full,
    /// the cache is cleared rather than evicting selectively.
    pub fn get_or_compute(
        &mut self,
        store: &RecordStore,
        filters: &FilterSet,
        palette: &Palette,
    ) -> ChartInputs {
        if store.generation() != self.generation {
            self.entries.clear();
            self.generation = store.generation();
        }

        if let Some(hit) = self.entries.get(filters) {
            self.hits += 1;
            return hit.clone();
        }

        self.misses += 1;
        let inputs = compute(store.records(), filters, palette);
        if self.capacity > 0 {
            if self.entries.len() >= self.capacity {
                self.entries.clear();
            }
            self.entries.insert(filters.clone(), inputs.clone());
        }
        inputs
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for PipelineCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}
