//! Fixture Service
//!
//! Serves buckets from the store while fresh and refreshes them from
//! upstream when missing or stale. When upstream fails, stale records are
//! better than nothing.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fixtures::bucket::CacheBucket;
use crate::fixtures::filter::{upstream_id, FixtureFilter};
use crate::fixtures::store::{FixtureRecord, FixtureStore};
use crate::fixtures::upstream::SportsApi;

pub struct FixtureService {
    store: Arc<dyn FixtureStore>,
    upstream: Arc<dyn SportsApi>,
    esports_patterns: Vec<String>,
    popular_leagues: Vec<u32>,
}

impl FixtureService {
    pub fn new(
        store: Arc<dyn FixtureStore>,
        upstream: Arc<dyn SportsApi>,
        esports_patterns: Vec<String>,
        popular_leagues: Vec<u32>,
    ) -> Self {
        Self {
            store,
            upstream,
            esports_patterns,
            popular_leagues,
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn FixtureStore>,
        upstream: Arc<dyn SportsApi>,
    ) -> Self {
        Self::new(
            store,
            upstream,
            config.esports_patterns.clone(),
            config.popular_leagues.clone(),
        )
    }

    // == Queries ==
    pub async fn fixtures_by_date(&self, date: NaiveDate, filter: FixtureFilter) -> Result<Vec<Value>> {
        let records = self.load(CacheBucket::Date(date)).await?;
        Ok(filter.apply(records, &self.esports_patterns))
    }

    pub async fn live_fixtures(&self, filter: FixtureFilter) -> Result<Vec<Value>> {
        let records = self.load(CacheBucket::Live).await?;
        Ok(filter.apply(records, &self.esports_patterns))
    }

    pub async fn league_fixtures(&self, league_id: u32, filter: FixtureFilter) -> Result<Vec<Value>> {
        let records = self.load(CacheBucket::League(league_id)).await?;
        Ok(filter.apply(records, &self.esports_patterns))
    }

    pub async fn league_info(&self, league_id: u32) -> Result<Value> {
        self.load(CacheBucket::LeagueInfo(league_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("league {}", league_id)))
    }

    /// Configured popular leagues, in configured order.
    pub async fn popular_leagues(&self) -> Result<Vec<Value>> {
        let records = self.load(CacheBucket::PopularLeagues).await?;
        let mut popular = Vec::with_capacity(self.popular_leagues.len());
        for id in &self.popular_leagues {
            if let Some(record) = records
                .iter()
                .find(|r| r.pointer("/league/id").and_then(Value::as_u64) == Some(u64::from(*id)))
            {
                popular.push(record.clone());
            }
        }
        Ok(popular)
    }

    pub async fn record_count(&self) -> usize {
        self.store.len().await
    }

    // == Load ==
    /// Returns the records of a bucket, refreshing it when missing or stale.
    ///
    /// Freshness is the time of the last full refresh of the bucket. A bucket
    /// with records but no refresh time is judged by its oldest record.
    async fn load(&self, bucket: CacheBucket) -> Result<Vec<Value>> {
        let key = bucket.key();
        let cached = self.store.bucket(&key).await?;
        let refreshed = match self.store.refreshed_at(&key).await? {
            Some(at) => Some(at),
            None => cached.iter().map(|r| r.timestamp).min(),
        };
        let now = Utc::now();

        match refreshed {
            Some(at) if bucket.is_fresh(at, now) => {
                debug!("Fixture cache HIT for {} ({} records)", key, cached.len());
                return Ok(cached.into_iter().map(|r| r.data).collect());
            }
            Some(_) => debug!("Fixture cache STALE for {}", key),
            None => debug!("Fixture cache MISS for {}", key),
        }

        match self.upstream.fetch(&bucket).await {
            Ok(raw) => Ok(self.persist(&bucket, raw).await),
            Err(e) if !cached.is_empty() => {
                warn!(
                    "Upstream failed for {}: {}, serving {} stale records",
                    key,
                    e,
                    cached.len()
                );
                Ok(cached.into_iter().map(|r| r.data).collect())
            }
            Err(e) => {
                warn!("Upstream failed for {} with nothing cached: {}", key, e);
                Err(e.into())
            }
        }
    }

    /// Replaces the bucket with the valid upstream records and returns them.
    /// The records are still returned when the store rejects the write.
    async fn persist(&self, bucket: &CacheBucket, raw: Vec<Value>) -> Vec<Value> {
        let key = bucket.key();
        let kind = bucket.record_kind();
        let fetched = raw.len();
        let mut records = Vec::with_capacity(fetched);
        let mut valid = Vec::with_capacity(fetched);

        for data in raw {
            let Some(id) = upstream_id(kind, &data) else {
                continue;
            };
            if matches!(bucket, CacheBucket::PopularLeagues)
                && !self.popular_leagues.iter().any(|p| u64::from(*p) == id)
            {
                continue;
            }

            let date = record_date(bucket, &data);
            let record = FixtureRecord::new(&key, id, date, data.clone());
            if let Err(e) = record.validate() {
                error!("Skipping {}:{}: {}", key, id, e);
                continue;
            }
            records.push(record);
            valid.push(data);
        }

        match self.store.replace_bucket(&key, records, Utc::now()).await {
            Ok(()) => info!(
                "Cached {} of {} upstream records for {}",
                valid.len(),
                fetched,
                key
            ),
            Err(e) => error!("Failed to persist bucket {}: {}", key, e),
        }
        valid
    }
}

fn record_date(bucket: &CacheBucket, data: &Value) -> String {
    if let CacheBucket::Date(date) = bucket {
        return date.format("%Y-%m-%d").to_string();
    }
    data.pointer("/fixture/date")
        .and_then(Value::as_str)
        .and_then(|s| s.get(..10))
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, UpstreamError};
    use crate::fixtures::store::MemoryFixtureStore;
    use async_trait::async_trait;
    use chrono::Duration;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Upstream returning a scripted payload and counting calls.
    struct ScriptedApi {
        payload: Mutex<std::result::Result<Vec<Value>, UpstreamError>>,
        calls: AtomicUsize,
    }

    impl ScriptedApi {
        fn ok(records: Vec<Value>) -> Arc<Self> {
            Arc::new(Self {
                payload: Mutex::new(Ok(records)),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                payload: Mutex::new(Err(UpstreamError::Status(503))),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn respond_with(&self, records: Vec<Value>) {
            *self.payload.lock().unwrap() = Ok(records);
        }
    }

    #[async_trait]
    impl SportsApi for ScriptedApi {
        async fn fetch(&self, _bucket: &CacheBucket) -> std::result::Result<Vec<Value>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payload.lock().unwrap().clone()
        }
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    #[async_trait]
    impl FixtureStore for ReadOnlyStore {
        async fn bucket(&self, _key: &str) -> std::result::Result<Vec<FixtureRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn upsert(&self, _record: FixtureRecord) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }

        async fn replace_bucket(
            &self,
            _key: &str,
            _records: Vec<FixtureRecord>,
            _refreshed_at: chrono::DateTime<Utc>,
        ) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".into()))
        }

        async fn refreshed_at(
            &self,
            _key: &str,
        ) -> std::result::Result<Option<chrono::DateTime<Utc>>, StoreError> {
            Ok(None)
        }

        async fn len(&self) -> usize {
            0
        }
    }

    fn fixture(id: u64, league: &str, country: Value) -> Value {
        json!({
            "fixture": {"id": id, "date": "2026-10-19T19:00:00+00:00"},
            "league": {"id": 39, "name": league, "country": country},
            "teams": {"home": {"name": "Arsenal"}, "away": {"name": "Chelsea"}}
        })
    }

    fn service(store: Arc<dyn FixtureStore>, api: Arc<ScriptedApi>) -> FixtureService {
        FixtureService::from_config(&Config::default(), store, api)
    }

    async fn seed(store: &MemoryFixtureStore, bucket: CacheBucket, id: u64, age: Duration) {
        let mut record = FixtureRecord::new(
            &bucket.key(),
            id,
            "2026-10-19",
            fixture(id, "Premier League", json!("England")),
        );
        record.timestamp = Utc::now() - age;
        store.upsert(record).await.unwrap();
    }

    #[tokio::test]
    async fn test_miss_fetches_and_persists_valid_records() {
        let store = Arc::new(MemoryFixtureStore::new());
        let api = ScriptedApi::ok(vec![
            fixture(1, "Premier League", json!("England")),
            json!({"fixture": {"id": 2}}),
        ]);
        let service = service(store.clone(), api.clone());
        let today = Utc::now().date_naive();

        let fixtures = service
            .fixtures_by_date(today, FixtureFilter::default())
            .await
            .unwrap();

        assert_eq!(fixtures.len(), 1);
        assert_eq!(store.len().await, 1);
        let key = CacheBucket::Date(today).key();
        assert_eq!(store.bucket(&key).await.unwrap()[0].fixture_id, format!("{}:1", key));

        service
            .fixtures_by_date(today, FixtureFilter::default())
            .await
            .unwrap();
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_today_stale_after_three_hours() {
        let store = Arc::new(MemoryFixtureStore::new());
        let today = Utc::now().date_naive();
        seed(&store, CacheBucket::Date(today), 1, Duration::hours(3)).await;
        let api = ScriptedApi::ok(vec![fixture(1, "Premier League", json!("England"))]);
        let service = service(store, api.clone());

        service
            .fixtures_by_date(today, FixtureFilter::default())
            .await
            .unwrap();

        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_yesterday_fresh_after_three_hours() {
        let store = Arc::new(MemoryFixtureStore::new());
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        seed(&store, CacheBucket::Date(yesterday), 1, Duration::hours(3)).await;
        let api = ScriptedApi::ok(Vec::new());
        let service = service(store, api.clone());

        let fixtures = service
            .fixtures_by_date(yesterday, FixtureFilter::default())
            .await
            .unwrap();

        assert_eq!(fixtures.len(), 1);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_stale_records_served_when_upstream_fails() {
        let store = Arc::new(MemoryFixtureStore::new());
        seed(&store, CacheBucket::Live, 5, Duration::minutes(5)).await;
        let service = service(store, ScriptedApi::failing());

        let fixtures = service.live_fixtures(FixtureFilter::default()).await.unwrap();
        assert_eq!(fixtures.len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_without_cache_is_error() {
        let service = service(Arc::new(MemoryFixtureStore::new()), ScriptedApi::failing());

        let result = service.league_fixtures(39, FixtureFilter::default()).await;
        assert!(matches!(result, Err(AppError::Upstream(UpstreamError::Status(503)))));
    }

    #[tokio::test]
    async fn test_refresh_drops_records_missing_upstream() {
        let store = Arc::new(MemoryFixtureStore::new());
        seed(&store, CacheBucket::Live, 1, Duration::seconds(40)).await;
        let api = ScriptedApi::ok(vec![fixture(2, "Premier League", json!("England"))]);
        let service = service(store.clone(), api.clone());

        for _ in 0..5 {
            let fixtures = service.live_fixtures(FixtureFilter::default()).await.unwrap();
            assert_eq!(fixtures.len(), 1);
            assert_eq!(fixtures[0]["fixture"]["id"], 2);
        }

        assert_eq!(api.calls(), 1);
        let live = store.bucket("live").await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].fixture_id, "live:2");
    }

    #[tokio::test]
    async fn test_refetch_with_fewer_records_shrinks_bucket() {
        let store = Arc::new(MemoryFixtureStore::new());
        let today = Utc::now().date_naive();
        for id in 1..=3 {
            seed(&store, CacheBucket::Date(today), id, Duration::hours(3)).await;
        }
        let api = ScriptedApi::ok(vec![fixture(3, "Premier League", json!("England"))]);
        let service = service(store.clone(), api.clone());

        let fixtures = service
            .fixtures_by_date(today, FixtureFilter::default())
            .await
            .unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(store.len().await, 1);

        let again = service
            .fixtures_by_date(today, FixtureFilter::default())
            .await
            .unwrap();
        assert_eq!(again, fixtures);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_refresh_stays_fresh() {
        let store = Arc::new(MemoryFixtureStore::new());
        seed(&store, CacheBucket::Live, 1, Duration::minutes(5)).await;
        let api = ScriptedApi::ok(Vec::new());
        let service = service(store.clone(), api.clone());

        assert!(service.live_fixtures(FixtureFilter::default()).await.unwrap().is_empty());
        api.respond_with(vec![fixture(9, "Premier League", json!("England"))]);
        assert!(service.live_fixtures(FixtureFilter::default()).await.unwrap().is_empty());

        assert_eq!(api.calls(), 1);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_exclusions_applied_at_response_time() {
        let store = Arc::new(MemoryFixtureStore::new());
        let api = ScriptedApi::ok(vec![
            fixture(1, "Premier League", json!("England")),
            fixture(2, "Esoccer GT Leagues", json!("World")),
            fixture(3, "Club Friendlies", Value::Null),
        ]);
        let service = service(store.clone(), api);

        let filtered = service.live_fixtures(FixtureFilter::default()).await.unwrap();
        let unfiltered = service.live_fixtures(FixtureFilter::none()).await.unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(unfiltered.len(), 3);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_persist_failures_are_skipped() {
        let api = ScriptedApi::ok(vec![fixture(1, "Premier League", json!("England"))]);
        let service = service(Arc::new(ReadOnlyStore), api);

        let fixtures = service.live_fixtures(FixtureFilter::default()).await.unwrap();
        assert_eq!(fixtures.len(), 1);
    }

    #[tokio::test]
    async fn test_popular_leagues_filtered_and_ordered() {
        let league = |id: u64, name: &str| json!({"league": {"id": id, "name": name}});
        let api = ScriptedApi::ok(vec![
            league(39, "Premier League"),
            league(999, "Regional League"),
            league(2, "UEFA Champions League"),
        ]);
        let service = FixtureService::new(
            Arc::new(MemoryFixtureStore::new()),
            api,
            Vec::new(),
            vec![2, 39],
        );

        let popular = service.popular_leagues().await.unwrap();

        let ids: Vec<u64> = popular
            .iter()
            .filter_map(|l| l.pointer("/league/id").and_then(Value::as_u64))
            .collect();
        assert_eq!(ids, vec![2, 39]);
    }

    #[tokio::test]
    async fn test_league_info_not_found() {
        let service = service(Arc::new(MemoryFixtureStore::new()), ScriptedApi::ok(Vec::new()));

        let result = service.league_info(123).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
