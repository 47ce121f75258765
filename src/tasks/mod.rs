//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache Cleanup: Purges expired logo and image entries at the configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
