//! Image Cache Module
//!
//! Generic key to URL cache used by image components.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{eviction, CacheEntry, CacheStats, CleanupReport};

/// Entries older than this are dropped on read.
pub const IMAGE_MAX_AGE_MS: u64 = 24 * 60 * 60 * 1000;

/// Default capacity of the image cache.
pub const IMAGE_MAX_SIZE: usize = 2000;

// == Image Type ==
/// What kind of image a cached URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Team,
    League,
    Flag,
    Generic,
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageType::Team => "team",
            ImageType::League => "league",
            ImageType::Flag => "flag",
            ImageType::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// Cached image URL tagged with its type.
#[derive(Debug, Clone, Serialize)]
pub struct CachedImage {
    pub url: String,
    pub image_type: ImageType,
}

// == Image Cache ==
/// TTL cache of image URLs with age-based eviction.
#[derive(Debug)]
pub struct ImageCache {
    entries: HashMap<String, CacheEntry<CachedImage>>,
    stats: CacheStats,
    max_size: usize,
    max_age_ms: u64,
}

impl ImageCache {
    // == Constructor ==
    /// Creates an image cache with the default 24h max age.
    pub fn new(max_size: usize) -> Self {
        Self::with_max_age(max_size, IMAGE_MAX_AGE_MS)
    }

    /// Creates an image cache with a custom max age.
    pub fn with_max_age(max_size: usize, max_age_ms: u64) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_size: max_size.max(1),
            max_age_ms,
        }
    }

    // == Get ==
    /// Returns the cached URL if present and younger than the max age.
    ///
    /// Stale entries are removed on the way out.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let max_age = self.max_age_ms;
        match self.entries.get(key) {
            Some(entry) if !entry.is_older_than(max_age) => {
                self.stats.record_hit();
                debug!("Image cache HIT for {}", key);
                Some(entry.value.url.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expiration();
                self.stats.record_miss();
                self.stats.set_total_entries(self.entries.len());
                debug!("Image cache entry expired for {}", key);
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Unconditional upsert. Runs a cleanup pass first when full.
    pub fn set(&mut self, key: &str, url: &str, image_type: ImageType, source: &str) {
        if self.entries.len() >= self.max_size {
            self.cleanup();
        }

        let value = CachedImage {
            url: url.to_string(),
            image_type,
        };
        self.entries
            .insert(key.to_string(), CacheEntry::new(key, value, source));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Cleanup ==
    /// Drops expired entries, then the oldest ones until at 80% of capacity.
    pub fn cleanup(&mut self) -> CleanupReport {
        let max_age = self.max_age_ms;
        let report = eviction::cleanup(&mut self.entries, self.max_size, |entry| {
            entry.is_older_than(max_age)
        });
        self.stats.record_cleanup(&report);
        self.stats.set_total_entries(self.entries.len());
        report
    }

    /// Returns the full entry for a key without TTL checks.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<CachedImage>> {
        self.entries.get(key)
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, key: &str, age_ms: u64) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.timestamp = entry.timestamp.saturating_sub(age_ms);
        }
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(IMAGE_MAX_SIZE)
    }
}
