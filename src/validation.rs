//! Link validation.
//!
//! Checks that a remote asset answers a HEAD request within a deadline.
//! The request carries its own reqwest timeout and is additionally raced
//! against a tokio timer, so a hung connection can never stall a lookup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::ValidationError;

/// Reachability check for candidate asset URLs.
#[async_trait]
pub trait LinkValidator: Send + Sync {
    /// Returns `Ok(())` when `url` answered 2xx before `timeout`.
    async fn check(&self, url: &str, timeout: Duration) -> Result<(), ValidationError>;
}

/// [`LinkValidator`] issuing HEAD requests through a shared reqwest client.
#[derive(Clone, Debug)]
pub struct HttpValidator {
    client: Client,
}

impl HttpValidator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpValidator {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl LinkValidator for HttpValidator {
    async fn check(&self, url: &str, timeout: Duration) -> Result<(), ValidationError> {
        let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidUrl(format!("{url}: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ValidationError::InvalidUrl(format!(
                    "scheme '{scheme}' not allowed for {url}"
                )));
            }
        }

        let request = self.client.head(parsed).timeout(timeout).send();

        let response = match tokio::time::timeout(timeout, request).await {
            Err(_) => return Err(ValidationError::Timeout(timeout)),
            Ok(Err(e)) if e.is_timeout() => return Err(ValidationError::Timeout(timeout)),
            Ok(Err(e)) => return Err(ValidationError::Network(e.to_string())),
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        if status.is_success() {
            debug!("Validated {} ({})", url, status);
            Ok(())
        } else {
            Err(ValidationError::Status(status.as_u16()))
        }
    }
}
