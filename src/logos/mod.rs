//! Logos Module
//!
//! Team logo, league logo and country flag resolution on top of the
//! logo caches.

mod countries;
mod manager;
mod teams;
mod types;

pub use countries::country_code;
pub use manager::{LogoCacheStats, LogoManager, LogoSettings, EUROPE_FLAG_URL, WORLD_FLAG_URL};
pub use teams::{classify_team, TeamKind};
pub use types::{
    FlagRequest, LeagueLogoRequest, LogoKind, LogoResponse, LogoShape, Sport, TeamLogoRequest,
};
