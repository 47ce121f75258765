//! Request DTOs for the HTTP API
//!
//! Query strings of the fixture and logo endpoints.

use serde::Deserialize;

use crate::fixtures::FixtureFilter;
use crate::logos::{LogoShape, Sport};

/// Query of the fixture endpoints (`?exclude_esports=&exclude_null_country=`)
///
/// Both exclusions default to on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureQuery {
    #[serde(default)]
    pub exclude_esports: Option<bool>,
    #[serde(default)]
    pub exclude_null_country: Option<bool>,
}

impl FixtureQuery {
    pub fn filter(&self) -> FixtureFilter {
        let defaults = FixtureFilter::default();
        FixtureFilter {
            exclude_esports: self.exclude_esports.unwrap_or(defaults.exclude_esports),
            exclude_null_country: self
                .exclude_null_country
                .unwrap_or(defaults.exclude_null_country),
        }
    }
}

/// Query of `GET /api/logos/team/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamLogoQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shape: LogoShape,
    #[serde(default)]
    pub sport: Sport,
    /// Component reported to the debug sink
    pub component: Option<String>,
}

/// Query of `GET /api/logos/league/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeagueLogoQuery {
    pub name: Option<String>,
    pub component: Option<String>,
}

/// Query of `GET /api/logos/flag/:country`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlagQuery {
    #[serde(default)]
    pub shape: LogoShape,
    pub component: Option<String>,
}
