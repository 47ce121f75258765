//! Cache buckets and their freshness windows.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Key prefix of date buckets.
pub const DATE_BUCKET_PREFIX: &str = "all-countries-fixtures";

// == Cache Bucket ==
/// Group of records fetched from upstream in one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheBucket {
    /// All fixtures of one day
    Date(NaiveDate),
    /// Fixtures currently in play
    Live,
    /// Fixtures of one league
    League(u32),
    /// League metadata
    LeagueInfo(u32),
    /// Curated league list
    PopularLeagues,
}

/// What a bucket holds, which decides how records are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Fixture,
    League,
}

impl CacheBucket {
    /// Storage key, stored as the `league` column of each record.
    pub fn key(&self) -> String {
        match self {
            CacheBucket::Date(date) => format!("{}:{}", DATE_BUCKET_PREFIX, date.format("%Y-%m-%d")),
            CacheBucket::Live => "live".to_string(),
            CacheBucket::League(id) => format!("league-{}", id),
            CacheBucket::LeagueInfo(id) => format!("league-info-{}", id),
            CacheBucket::PopularLeagues => "popular-leagues".to_string(),
        }
    }

    pub fn record_kind(&self) -> RecordKind {
        match self {
            CacheBucket::Date(_) | CacheBucket::Live | CacheBucket::League(_) => RecordKind::Fixture,
            CacheBucket::LeagueInfo(_) | CacheBucket::PopularLeagues => RecordKind::League,
        }
    }

    // == Freshness ==
    /// How long records of this bucket stay fresh, relative to `today`.
    ///
    /// Past days rarely change, today's fixtures change often and future
    /// fixtures change occasionally.
    pub fn max_age(&self, today: NaiveDate) -> Duration {
        match self {
            CacheBucket::Date(date) if *date < today => Duration::days(7),
            CacheBucket::Date(date) if *date == today => Duration::hours(2),
            CacheBucket::Date(_) => Duration::hours(12),
            CacheBucket::Live => Duration::seconds(30),
            CacheBucket::League(_) => Duration::hours(12),
            CacheBucket::LeagueInfo(_) | CacheBucket::PopularLeagues => Duration::hours(24),
        }
    }

    /// Whether a record written at `written` is still fresh at `now`.
    /// Today is the UTC date of `now`.
    pub fn is_fresh(&self, written: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(written) < self.max_age(now.date_naive())
    }
}

impl fmt::Display for CacheBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shaped = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
