//! Fixtures Module
//!
//! Server-side cache of upstream fixture and league data, persisted per
//! record and refreshed per bucket with date-relative freshness.

mod bucket;
mod filter;
mod service;
mod store;
mod upstream;

pub use bucket::{parse_date, CacheBucket, RecordKind, DATE_BUCKET_PREFIX};
pub use filter::{is_esports, upstream_id, FixtureFilter};
pub use service::FixtureService;
pub use store::{FixtureRecord, FixtureStore, MemoryFixtureStore};
pub use upstream::{ApiSportsClient, SportsApi};
