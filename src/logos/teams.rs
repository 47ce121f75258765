//! National team vs club classification.

use crate::logos::countries::country_code;

/// Suffixes national youth and women's sides carry after the country name.
const NATIONAL_SUFFIXES: &[&str] = &[
    " U17", " U18", " U19", " U20", " U21", " U23", " W", " Women", " Olympic",
];

/// How a team's logo is sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamKind {
    /// A country's representative side
    National { country_code: &'static str },
    Club,
}

impl TeamKind {
    pub fn is_national(&self) -> bool {
        matches!(self, TeamKind::National { .. })
    }
}

/// Classifies a team from its display name.
///
/// A name is national when it is a known country, optionally followed by a
/// youth, women's or olympic suffix (`Brazil U20`, `Spain W`).
pub fn classify_team(team_name: &str) -> TeamKind {
    let name = team_name.trim();

    if let Some(code) = country_code(name) {
        return TeamKind::National { country_code: code };
    }

    for suffix in NATIONAL_SUFFIXES {
        let Some(split) = name.len().checked_sub(suffix.len()) else {
            continue;
        };
        if let (Some(base), Some(tail)) = (name.get(..split), name.get(split..)) {
            if tail.eq_ignore_ascii_case(suffix) {
                if let Some(code) = country_code(base) {
                    return TeamKind::National { country_code: code };
                }
            }
        }
    }

    TeamKind::Club
}
