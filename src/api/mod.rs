//! API Module
//!
//! HTTP handlers and routing for the fixture, league, logo and debug
//! endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
