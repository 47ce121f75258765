//! Persisted fixture records.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// One upstream record persisted under its bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureRecord {
    /// `"{bucket}:{upstream id}"`
    pub fixture_id: String,
    /// Bucket key
    pub league: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

impl FixtureRecord {
    pub fn new(bucket: &str, upstream_id: u64, date: impl Into<String>, data: Value) -> Self {
        Self {
            fixture_id: format!("{}:{}", bucket, upstream_id),
            league: bucket.to_string(),
            date: date.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    /// Rejects records that cannot be addressed by id or bucket.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.fixture_id.is_empty() || self.league.is_empty() {
            return Err(StoreError::InvalidRecord(format!(
                "record '{}' has no id or bucket",
                self.fixture_id
            )));
        }
        Ok(())
    }
}

// == Fixture Store ==
/// Storage of fixture records. Upserts are last-write-wins.
#[async_trait]
pub trait FixtureStore: Send + Sync {
    /// All records of a bucket, ordered by fixture id.
    async fn bucket(&self, key: &str) -> Result<Vec<FixtureRecord>, StoreError>;

    /// Inserts or overwrites a record by fixture id.
    async fn upsert(&self, record: FixtureRecord) -> Result<(), StoreError>;

    /// Overwrites a whole bucket with the result of one upstream refresh.
    ///
    /// Records of the bucket absent from `records` are dropped, every kept
    /// record is stamped `refreshed_at`, and the bucket remembers the refresh
    /// time even when `records` is empty. Nothing changes on error.
    async fn replace_bucket(
        &self,
        key: &str,
        records: Vec<FixtureRecord>,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Time of the last [`FixtureStore::replace_bucket`] of a bucket.
    async fn refreshed_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Number of stored records.
    async fn len(&self) -> usize;
}

/// In-process [`FixtureStore`].
#[derive(Debug, Default)]
pub struct MemoryFixtureStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: HashMap<String, FixtureRecord>,
    refreshed: HashMap<String, DateTime<Utc>>,
}

impl MemoryFixtureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FixtureStore for MemoryFixtureStore {
    async fn bucket(&self, key: &str) -> Result<Vec<FixtureRecord>, StoreError> {
        let state = self.state.read().await;
        let mut bucket: Vec<FixtureRecord> = state
            .records
            .values()
            .filter(|record| record.league == key)
            .cloned()
            .collect();
        bucket.sort_by(|a, b| a.fixture_id.cmp(&b.fixture_id));
        Ok(bucket)
    }

    async fn upsert(&self, record: FixtureRecord) -> Result<(), StoreError> {
        record.validate()?;
        self.state
            .write()
            .await
            .records
            .insert(record.fixture_id.clone(), record);
        Ok(())
    }

    async fn replace_bucket(
        &self,
        key: &str,
        records: Vec<FixtureRecord>,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        for record in &records {
            record.validate()?;
            if record.league != key {
                return Err(StoreError::InvalidRecord(format!(
                    "record '{}' does not belong to bucket '{}'",
                    record.fixture_id, key
                )));
            }
        }

        let mut state = self.state.write().await;
        state.records.retain(|_, record| record.league != key);
        for mut record in records {
            record.timestamp = refreshed_at;
            state.records.insert(record.fixture_id.clone(), record);
        }
        state.refreshed.insert(key.to_string(), refreshed_at);
        Ok(())
    }

    async fn refreshed_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.state.read().await.refreshed.get(key).copied())
    }

    async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }
}
