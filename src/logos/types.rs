//! Request and response types of the logo manager.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which logo cache a request goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoKind {
    Team,
    League,
    Flag,
}

impl fmt::Display for LogoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogoKind::Team => "team",
            LogoKind::League => "league",
            LogoKind::Flag => "flag",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoShape {
    #[default]
    Circular,
    Square,
}

impl fmt::Display for LogoShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogoShape::Circular => "circular",
            LogoShape::Square => "square",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    #[default]
    Football,
    Basketball,
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sport::Football => "football",
            Sport::Basketball => "basketball",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamLogoRequest {
    pub team_id: String,
    pub team_name: String,
    #[serde(default)]
    pub shape: LogoShape,
    #[serde(default)]
    pub sport: Sport,
}

impl TeamLogoRequest {
    pub fn cache_key(&self) -> String {
        format!("team-{}-{}-{}", self.sport, self.team_id.trim(), self.shape)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlagRequest {
    pub country: String,
    #[serde(default)]
    pub shape: LogoShape,
}

impl FlagRequest {
    pub fn cache_key(&self) -> String {
        format!("flag-{}-{}", self.country.trim(), self.shape)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueLogoRequest {
    pub league_id: u32,
    #[serde(default)]
    pub league_name: Option<String>,
}

impl LeagueLogoRequest {
    pub fn cache_key(&self) -> String {
        format!("league-{}", self.league_id)
    }
}

/// Outcome of a logo lookup. `url` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogoResponse {
    pub url: String,
    pub fallback_used: bool,
    pub cached: bool,
    pub load_time_ms: u64,
    pub source: String,
}
