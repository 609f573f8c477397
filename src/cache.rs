//! Memoized capabilities for dynamic ranges that are not fully specified.

use crate::capabilities::CapabilitiesByQuality;
use crate::dynamic_range::DynamicRange;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A stored `None` records that the range cannot be resolved, so it is never rescanned.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<DynamicRange, Option<Arc<CapabilitiesByQuality>>>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result for `dynamic_range`, running `build` at most once
    /// per range even under concurrent callers.
    pub fn get_or_build<F>(
        &self,
        dynamic_range: &DynamicRange,
        build: F,
    ) -> Option<Arc<CapabilitiesByQuality>>
    where
        F: FnOnce() -> Option<CapabilitiesByQuality>,
    {
        if let Some(cached) = self.read().get(dynamic_range) {
            return cached.clone();
        }

        let mut entries = self.write();
        // Another caller may have filled the entry between the two locks.
        if let Some(cached) = entries.get(dynamic_range) {
            return cached.clone();
        }

        let built = build().map(Arc::new);
        debug!(
            "Cached capabilities for {}: {}",
            dynamic_range,
            if built.is_some() { "resolved" } else { "unresolvable" }
        );
        entries.insert(*dynamic_range, built.clone());
        built
    }

    pub fn contains(&self, dynamic_range: &DynamicRange) -> bool {
        self.read().contains_key(dynamic_range)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(
        &self,
    ) -> RwLockReadGuard<'_, HashMap<DynamicRange, Option<Arc<CapabilitiesByQuality>>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(
        &self,
    ) -> RwLockWriteGuard<'_, HashMap<DynamicRange, Option<Arc<CapabilitiesByQuality>>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
