//! Cache Module
//!
//! In-memory TTL caches for image URLs and logos, sharing one entry type
//! and one age-based eviction policy.

mod entry;
pub mod eviction;
mod image;
mod logo;
mod stats;


// Re-export public types
pub use entry::{current_timestamp_ms, is_fallback_url, CacheEntry};
pub use eviction::CleanupReport;
pub use image::{CachedImage, ImageCache, ImageType, IMAGE_MAX_AGE_MS, IMAGE_MAX_SIZE};
pub use logo::{LogoCache, LogoCacheConfig};
pub use stats::CacheStats;
