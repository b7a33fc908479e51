use alloc::collections::VecDeque;

use crate::key::{KeyCacheKey, KeyMap};

/// Item heights keyed by item identity, bounded to `capacity` entries.
///
/// When full, the oldest inserted key is evicted. Overwriting a key keeps its original insertion
/// position.
#[derive(Clone, Debug)]
pub(crate) struct MeasurementCache<K> {
    heights: KeyMap<K, u32>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: KeyCacheKey + Clone> MeasurementCache<K> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            heights: KeyMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.heights.len()
    }

    pub(crate) fn get(&self, key: &K) -> Option<u32> {
        self.heights.get(key).copied()
    }

    pub(crate) fn insert(&mut self, key: K, height: u32) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.heights.get_mut(&key) {
            *slot = height;
            return;
        }
        while self.heights.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.heights.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.heights.insert(key, height);
    }

    pub(crate) fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.heights.len() > capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.heights.remove(&oldest);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.heights.clear();
        self.order.clear();
    }

    /// Iterates entries from oldest to newest.
    pub(crate) fn for_each(&self, mut f: impl FnMut(&K, u32)) {
        for key in &self.order {
            if let Some(&height) = self.heights.get(key) {
                f(key, height);
            }
        }
    }
}
