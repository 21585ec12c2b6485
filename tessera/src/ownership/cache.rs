//! Per-image cache of region sets and their lazily built ownership indices.

use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::region::{RegionId, RegionSet};

use super::OwnershipIndex;

#[derive(Debug)]
struct CacheEntry {
    set: Arc<RegionSet>,
    index: OnceLock<Arc<OwnershipIndex>>,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Image ids, oldest insertion first.
    order: VecDeque<String>,
}

/// Region sets keyed by image identifier.
///
/// The ownership index of an entry is built on first use and dropped with
/// the entry, so replacing an image's set invalidates its index. With a
/// capacity, inserting beyond it evicts the oldest image.
#[derive(Debug, Default)]
pub struct RegionCache {
    inner: RwLock<CacheInner>,
    capacity: Option<usize>,
}

impl RegionCache {
    /// Unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `capacity` images.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        assert!(capacity >= 1, "cache capacity must be at least 1");
        Self {
            inner: RwLock::default(),
            capacity: Some(capacity),
        }
    }

    /// Stores `set` for `image_id`, replacing any previous set.
    pub fn insert(&self, image_id: impl Into<String>, set: RegionSet) -> Arc<RegionSet> {
        let image_id = image_id.into();
        let set = Arc::new(set);
        let mut inner = self.inner.write();

        let entry = CacheEntry {
            set: Arc::clone(&set),
            index: OnceLock::new(),
        };
        if inner.entries.insert(image_id.clone(), entry).is_some() {
            tracing::debug!("Replaced region set for '{}'", image_id);
        } else {
            inner.order.push_back(image_id);
        }

        if let Some(capacity) = self.capacity {
            while inner.entries.len() > capacity {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.entries.remove(&oldest);
                tracing::debug!("Evicted region set for '{}'", oldest);
            }
        }

        set
    }

    pub fn get(&self, image_id: &str) -> Option<Arc<RegionSet>> {
        let inner = self.inner.read();
        let set = inner.entries.get(image_id).map(|entry| Arc::clone(&entry.set));
        if set.is_none() {
            tracing::debug!("Region cache miss for '{}'", image_id);
        }
        set
    }

    /// Ownership index for `image_id`, built on the first request.
    pub fn ownership(&self, image_id: &str) -> Option<Arc<OwnershipIndex>> {
        let inner = self.inner.read();
        let entry = inner.entries.get(image_id)?;
        let index = entry
            .index
            .get_or_init(|| Arc::new(OwnershipIndex::build(&entry.set)));
        Some(Arc::clone(index))
    }

    /// Id of the region under `(x, y)` in the cached image, if any.
    pub fn hit_test(&self, image_id: &str, x: i64, y: i64) -> Option<RegionId> {
        self.ownership(image_id)?.owner(x, y)
    }

    pub fn remove(&self, image_id: &str) -> Option<Arc<RegionSet>> {
        let mut inner = self.inner.write();
        let entry = inner.entries.remove(image_id)?;
        inner.order.retain(|id| id != image_id);
        Some(entry.set)
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn contains(&self, image_id: &str) -> bool {
        self.inner.read().entries.contains_key(image_id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
