//! Eviction Module
//!
//! Age-based eviction shared by the image and logo caches.
//!
//! Expired entries go first. If the cache is still above the target
//! occupancy, the oldest entries by timestamp are dropped until it is not.
//! Reads do not refresh an entry's position: this is not an LRU.

use std::collections::HashMap;

use serde::Serialize;

use crate::cache::CacheEntry;

/// Fraction of `max_size` a cleanup pass shrinks the cache down to.
pub const TARGET_OCCUPANCY: f64 = 0.8;

// == Cleanup Report ==
/// Outcome of a single cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Entries removed because they were past their TTL
    pub expired: usize,
    /// Live entries removed to get back under the target occupancy
    pub evicted: usize,
}

impl CleanupReport {
    /// Total number of removed entries.
    pub fn removed(&self) -> usize {
        self.expired + self.evicted
    }
}

/// Number of entries a cache of `max_size` holds after a cleanup pass.
pub fn target_size(max_size: usize) -> usize {
    (max_size as f64 * TARGET_OCCUPANCY).floor() as usize
}

// == Cleanup ==
/// Purges expired entries, then evicts oldest-first down to the target size.
///
/// # Arguments
/// * `entries` - The cache map to prune in place
/// * `max_size` - Capacity of the owning cache
/// * `is_expired` - TTL rule of the owning cache
pub fn cleanup<V, F>(
    entries: &mut HashMap<String, CacheEntry<V>>,
    max_size: usize,
    is_expired: F,
) -> CleanupReport
where
    F: Fn(&CacheEntry<V>) -> bool,
{
    let before = entries.len();
    entries.retain(|_, entry| !is_expired(entry));
    let expired = before - entries.len();

    let target = target_size(max_size);
    let mut evicted = 0;

    if entries.len() > target {
        let mut by_age: Vec<(u64, String)> = entries
            .iter()
            .map(|(key, entry)| (entry.timestamp, key.clone()))
            .collect();
        by_age.sort();

        let excess = entries.len() - target;
        for (_, key) in by_age.into_iter().take(excess) {
            entries.remove(&key);
            evicted += 1;
        }
    }

    CleanupReport { expired, evicted }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(key: &str, timestamp: u64) -> CacheEntry<String> {
        let mut entry = CacheEntry::new(key, format!("url-{}", key), "test");
        entry.timestamp = timestamp;
        entry
    }

    fn map_of(entries: Vec<CacheEntry<String>>) -> HashMap<String, CacheEntry<String>> {
        entries.into_iter().map(|e| (e.key.clone(), e)).collect()
    }

    #[test]
    fn test_target_size() {
        assert_eq!(target_size(2000), 1600);
        assert_eq!(target_size(10), 8);
        assert_eq!(target_size(1), 0);
    }

    #[test]
    fn test_expired_removed_first() {
        let mut entries = map_of(vec![entry_at("a", 1), entry_at("b", 2), entry_at("c", 3)]);

        let report = cleanup(&mut entries, 10, |e| e.key == "b");

        assert_eq!(report, CleanupReport { expired: 1, evicted: 0 });
        assert!(entries.contains_key("a"));
        assert!(!entries.contains_key("b"));
    }

    #[test]
    fn test_oldest_evicted_down_to_target() {
        let entries: Vec<_> = (0..10).map(|i| entry_at(&format!("k{}", i), i)).collect();
        let mut entries = map_of(entries);

        let report = cleanup(&mut entries, 10, |_| false);

        assert_eq!(report.evicted, 2);
        assert_eq!(entries.len(), 8);
        assert!(!entries.contains_key("k0"));
        assert!(!entries.contains_key("k1"));
        assert!(entries.contains_key("k2"));
        assert!(entries.contains_key("k9"));
    }

    #[test]
    fn test_no_eviction_below_target() {
        let mut entries = map_of(vec![entry_at("a", 1), entry_at("b", 2)]);

        let report = cleanup(&mut entries, 10, |_| false);

        assert_eq!(report.removed(), 0);
        assert_eq!(entries.len(), 2);
    }
}
