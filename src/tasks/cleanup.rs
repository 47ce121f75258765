//! Cache Cleanup Task
//!
//! Background task that periodically purges expired logo and image entries
//! and caps cache sizes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::images::ImageService;
use crate::logos::LogoManager;

/// Spawns a background task that runs a cleanup pass over the logo caches
/// and the image cache every `cleanup_interval_secs`.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_cleanup_task(state.logos.clone(), state.images.clone(), 3600);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(
    logos: Arc<LogoManager>,
    images: Arc<ImageService>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let logo_report = logos.cleanup().await;
            let image_report = images.cleanup().await;
            let removed = logo_report.removed() + image_report.removed();

            if removed > 0 {
                info!(
                    "Cache cleanup: removed {} logo entries ({} expired) and {} image entries ({} expired)",
                    logo_report.removed(),
                    logo_report.expired,
                    image_report.removed(),
                    image_report.expired
                );
            } else {
                debug!("Cache cleanup: nothing to remove");
            }
        }
    })
}
