//! Request and Response models for the HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing query strings and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{FixtureQuery, FlagQuery, LeagueLogoQuery, TeamLogoQuery};
pub use responses::{
    ClearResponse, DebugStatsResponse, FixturesResponse, HealthResponse, LeaguesResponse,
};
