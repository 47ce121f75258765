//! Logo Cache Module
//!
//! URL cache for team, league and flag logos with an asymmetric TTL:
//! entries pointing at the fallback asset expire much sooner than real
//! logos, so a recovered upstream source gets picked up again.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{eviction, is_fallback_url, CacheEntry, CacheStats, CleanupReport};

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

// == Logo Cache Config ==
/// Tuning knobs for one logo cache instance.
#[derive(Debug, Clone)]
pub struct LogoCacheConfig {
    /// Max age of entries pointing at a real logo
    pub max_age: Duration,
    /// Max age of entries pointing at the fallback asset
    pub fallback_max_age: Duration,
    /// Capacity before a cleanup pass is forced
    pub max_size: usize,
    /// Interval of the background cleanup task
    pub cleanup_interval: Duration,
    /// Validation attempts allowed before a failing key is left alone
    pub max_retries: u32,
    /// Path of the static fallback asset
    pub fallback_path: String,
}

impl LogoCacheConfig {
    pub fn team() -> Self {
        Self {
            max_size: 1000,
            ..Self::default()
        }
    }

    pub fn league() -> Self {
        Self {
            max_size: 500,
            ..Self::default()
        }
    }

    pub fn flag() -> Self {
        Self {
            max_size: 300,
            ..Self::default()
        }
    }

    /// Replaces the fallback asset path.
    pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = path.into();
        self
    }
}

impl Default for LogoCacheConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_millis(30 * DAY_MS),
            fallback_max_age: Duration::from_millis(7 * DAY_MS),
            max_size: 500,
            cleanup_interval: Duration::from_secs(60 * 60),
            max_retries: 3,
            fallback_path: "/assets/fallback-logo.svg".to_string(),
        }
    }
}

// == Logo Cache ==
/// One logo cache instance (team, league or flag).
#[derive(Debug)]
pub struct LogoCache {
    name: &'static str,
    entries: HashMap<String, CacheEntry<String>>,
    stats: CacheStats,
    config: LogoCacheConfig,
}

impl LogoCache {
    // == Constructor ==
    pub fn new(name: &'static str, config: LogoCacheConfig) -> Self {
        let config = LogoCacheConfig {
            max_size: config.max_size.max(1),
            ..config
        };
        Self {
            name,
            entries: HashMap::new(),
            stats: CacheStats::new(),
            config,
        }
    }

    // == Effective Max Age ==
    /// TTL applied to an entry, chosen from its value.
    pub fn effective_max_age(&self, entry: &CacheEntry<String>) -> Duration {
        if is_fallback_url(&entry.value, &self.config.fallback_path) {
            self.config.fallback_max_age
        } else {
            self.config.max_age
        }
    }

    fn is_stale(&self, entry: &CacheEntry<String>) -> bool {
        entry.is_older_than(self.effective_max_age(entry).as_millis() as u64)
    }

    // == Set Cached ==
    /// Upserts a URL. The retry counter starts over.
    pub fn set_cached(&mut self, key: &str, url: &str, source: &str, verified: bool) {
        if !self.entries.contains_key(key) && self.entries.len() >= self.config.max_size {
            let report = self.cleanup();
            debug!(
                "{} logo cache full, cleanup removed {} entries",
                self.name,
                report.removed()
            );
        }

        let entry = CacheEntry::new(key, url.to_string(), source).verified(verified);
        self.entries.insert(key.to_string(), entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get Cached ==
    /// Returns the entry if it is still within its effective TTL.
    ///
    /// Expired entries are deleted.
    pub fn get_cached(&mut self, key: &str) -> Option<CacheEntry<String>> {
        let stale = match self.entries.get(key) {
            Some(entry) => self.is_stale(entry),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if stale {
            self.entries.remove(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            debug!("{} logo cache entry expired: {}", self.name, key);
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).cloned()
    }

    // == Mark As Verified ==
    /// Flags the entry as confirmed reachable and extends its life.
    pub fn mark_as_verified(&mut self, key: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.verified = true;
                entry.touch();
                true
            }
            None => false,
        }
    }

    // == Increment Retry ==
    /// Counts a failed validation against `key`.
    ///
    /// Returns whether another attempt is still allowed. Unknown keys have
    /// nothing to retry and return false. The count stops at `max_retries`.
    pub fn increment_retry(&mut self, key: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) if entry.retry_count >= self.config.max_retries => false,
            Some(entry) => {
                entry.retry_count += 1;
                entry.retry_count < self.config.max_retries
            }
            None => false,
        }
    }

    /// Refreshes the timestamp of an entry, keeping its retry count.
    pub fn refresh(&mut self, key: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch();
                true
            }
            None => false,
        }
    }

    // == Cleanup ==
    /// Purges expired entries and caps the size, oldest first.
    pub fn cleanup(&mut self) -> CleanupReport {
        let fallback_path = self.config.fallback_path.clone();
        let max_age = self.config.max_age.as_millis() as u64;
        let fallback_max_age = self.config.fallback_max_age.as_millis() as u64;

        let report = eviction::cleanup(&mut self.entries, self.config.max_size, |entry| {
            if is_fallback_url(&entry.value, &fallback_path) {
                entry.is_older_than(fallback_max_age)
            } else {
                entry.is_older_than(max_age)
            }
        });
        self.stats.record_cleanup(&report);
        self.stats.set_total_entries(self.entries.len());
        report
    }

    /// Returns the entry for a key without TTL checks or stats updates.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<String>> {
        self.entries.get(key)
    }

    pub fn config(&self) -> &LogoCacheConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        self.name
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

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, key: &str, age: Duration) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.timestamp = entry.timestamp.saturating_sub(age.as_millis() as u64);
        }
    }

}
