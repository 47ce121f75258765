//! Structural validation and response-time filtering of upstream records.

use serde_json::Value;

use crate::fixtures::bucket::RecordKind;

// == Structural Validation ==
/// Upstream id of a record that has every field the API needs to render
/// it, or None when the record is incomplete.
///
/// Fixtures need a fixture id, league id and name, and both team names.
/// League records need a league id and name.
pub fn upstream_id(kind: RecordKind, record: &Value) -> Option<u64> {
    let league_id = record.pointer("/league/id").and_then(Value::as_u64)?;
    non_empty(record.pointer("/league/name"))?;

    match kind {
        RecordKind::League => Some(league_id),
        RecordKind::Fixture => {
            let fixture_id = record.pointer("/fixture/id").and_then(Value::as_u64)?;
            non_empty(record.pointer("/teams/home/name"))?;
            non_empty(record.pointer("/teams/away/name"))?;
            Some(fixture_id)
        }
    }
}

fn non_empty(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// == Exclusion Filter ==
/// Exclusions applied when a bucket is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureFilter {
    pub exclude_esports: bool,
    pub exclude_null_country: bool,
}

impl Default for FixtureFilter {
    fn default() -> Self {
        Self {
            exclude_esports: true,
            exclude_null_country: true,
        }
    }
}

impl FixtureFilter {
    pub fn none() -> Self {
        Self {
            exclude_esports: false,
            exclude_null_country: false,
        }
    }

    /// Whether a structurally valid record passes the exclusions.
    pub fn accepts(&self, record: &Value, esports_patterns: &[String]) -> bool {
        if self.exclude_esports && is_esports(record, esports_patterns) {
            return false;
        }
        if self.exclude_null_country && non_empty(record.pointer("/league/country")).is_none() {
            return false;
        }
        true
    }

    pub fn apply(&self, records: Vec<Value>, esports_patterns: &[String]) -> Vec<Value> {
        records
            .into_iter()
            .filter(|record| self.accepts(record, esports_patterns))
            .collect()
    }
}

/// Matches the league name against the patterns, case-insensitively.
pub fn is_esports(record: &Value, patterns: &[String]) -> bool {
    let Some(name) = non_empty(record.pointer("/league/name")) else {
        return false;
    };
    let name = name.to_lowercase();
    patterns
        .iter()
        .any(|pattern| !pattern.is_empty() && name.contains(&pattern.to_lowercase()))
}
