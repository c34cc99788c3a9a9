//! Callback notification with resilient retry
//!
//! Announces the tunnel's public URL to a local listener. The listener may
//! start slightly after we do, so every failure is treated as retryable
//! until the backoff policy's elapsed ceiling passes.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backoff::{Backoff, BackoffConfig};

/// Callback notification errors
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("Callback listener not reachable within the retry budget: {last_error}")]
    DeadlineExceeded { last_error: String },

    #[error("Callback notification cancelled")]
    Cancelled,
}

/// Notifies a local listener of the tunnel URL, retrying with exponential
/// backoff until acknowledged.
pub struct CallbackNotifier {
    client: reqwest::Client,
    backoff_config: BackoffConfig,
}

impl Default for CallbackNotifier {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}

impl CallbackNotifier {
    pub fn new(backoff_config: BackoffConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            backoff_config,
        }
    }

    /// POST the raw tunnel URL as `text/plain` to `{local_base}/{path}`.
    /// Any 2xx acknowledges the notification; every other status and every
    /// transport failure retries the whole request after the next backoff
    /// delay. Returns `Cancelled` as soon as `cancel` fires.
    pub async fn notify(
        &self,
        local_base: &str,
        callback_path: &str,
        tunnel_url: &str,
        cancel: &CancellationToken,
    ) -> Result<(), CallbackError> {
        let endpoint = format!("{local_base}/{callback_path}");
        info!(endpoint = %endpoint, "Notifying listener of tunnel URL");

        let mut backoff = Backoff::new(self.backoff_config.clone());
        loop {
            match self.attempt(&endpoint, tunnel_url).await {
                Ok(()) => {
                    debug!(attempts = backoff.attempt() + 1, "Callback acknowledged");
                    return Ok(());
                }
                Err(reason) => {
                    warn!(endpoint = %endpoint, %reason, "Callback attempt failed");
                    let delay = backoff
                        .next_delay()
                        .ok_or(CallbackError::DeadlineExceeded { last_error: reason })?;
                    tokio::select! {
                        _ = cancel.cancelled() => return Err(CallbackError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    async fn attempt(&self, endpoint: &str, tunnel_url: &str) -> Result<(), String> {
        let response = self
            .client
            .post(endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(tunnel_url.to_string())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("callback returned status {}", response.status()))
        }
    }
}
