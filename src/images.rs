//! Image Service
//!
//! Async facade over the shared [`ImageCache`]: plain get/set plus
//! validate-then-cache for remote URLs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CleanupReport, ImageCache, ImageType};
use crate::validation::LinkValidator;

/// Deadline of the HEAD check in `validate_and_cache`.
pub const IMAGE_VALIDATION_TIMEOUT: Duration = Duration::from_secs(2);

pub struct ImageService {
    cache: RwLock<ImageCache>,
    validator: Arc<dyn LinkValidator>,
    timeout: Duration,
}

impl ImageService {
    pub fn new(cache: ImageCache, validator: Arc<dyn LinkValidator>) -> Self {
        Self::with_timeout(cache, validator, IMAGE_VALIDATION_TIMEOUT)
    }

    pub fn with_timeout(
        cache: ImageCache,
        validator: Arc<dyn LinkValidator>,
        timeout: Duration,
    ) -> Self {
        Self {
            cache: RwLock::new(cache),
            validator,
            timeout,
        }
    }

    pub async fn get_cached_image(&self, key: &str) -> Option<String> {
        self.cache.write().await.get(key)
    }

    pub async fn set_cached_image(&self, key: &str, url: &str, image_type: ImageType, source: &str) {
        self.cache.write().await.set(key, url, image_type, source);
    }

    /// Caches `url` under `key` if it is usable.
    ///
    /// Local assets and `data:` URIs are cached without a request. Remote
    /// URLs must answer a HEAD request within the timeout. Returns whether
    /// the URL was cached; failures are logged, never raised.
    pub async fn validate_and_cache(&self, key: &str, url: &str, image_type: ImageType) -> bool {
        if is_trusted_local(url) {
            self.set_cached_image(key, url, image_type, "local").await;
            return true;
        }

        match self.validator.check(url, self.timeout).await {
            Ok(()) => {
                self.set_cached_image(key, url, image_type, "validated").await;
                info!("Validated and cached {} image {}", image_type, key);
                true
            }
            Err(e) => {
                warn!("Image validation failed for {} ({}): {}", url, e.kind(), e);
                false
            }
        }
    }

    pub async fn cleanup(&self) -> CleanupReport {
        let report = self.cache.write().await.cleanup();
        debug!("Image cache cleanup removed {} entries", report.removed());
        report
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }
}

fn is_trusted_local(url: &str) -> bool {
    url.starts_with("/assets/") || url.starts_with("data:")
}
