//! Provisioning service client
//!
//! Requests a new ephemeral quick tunnel from the provisioning service. The
//! service is open and unauthenticated; anything it issues carries no uptime
//! guarantee.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::banner::ascii_box;
use crate::model::{Credentials, SessionConfig};

/// Bounds the TLS handshake, response headers and the overall round trip.
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

const DISCLAIMER: &str = "Thank you for trying Cloudflare Tunnel. Doing so, without a Cloudflare \
     account, is a quick way to experiment and try it out. However, be aware that these \
     account-less Tunnels have no uptime guarantee. If you intend to use Tunnels in production \
     you should use a pre-created named tunnel by following: \
     https://developers.cloudflare.com/cloudflare-one/connections/connect-apps";

/// Provisioning errors
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Failed to request quick tunnel: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to decode quick tunnel response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Provisioning service rejected the request: {code}: {message}")]
    Service { code: i64, message: String },

    #[error("Failed to parse quick tunnel ID {id:?}: {source}")]
    InvalidTunnelId {
        id: String,
        #[source]
        source: uuid::Error,
    },
}

impl ProvisionError {
    /// Whether this failure was a network timeout rather than a bad response.
    pub fn is_timeout(&self) -> bool {
        match self {
            ProvisionError::Request(e) | ProvisionError::Decode(e) => e.is_timeout(),
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TunnelResponse {
    #[serde(default)]
    success: bool,
    result: Option<TunnelResult>,
    #[serde(default)]
    errors: Vec<TunnelResponseError>,
}

#[derive(Debug, Deserialize)]
struct TunnelResult {
    id: String,
    name: String,
    hostname: String,
    account_tag: String,
    #[serde(default, with = "crate::model::base64_bytes")]
    secret: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct TunnelResponseError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Client for the quick tunnel provisioning API.
pub struct ProvisioningClient {
    client: reqwest::Client,
    service_url: String,
}

impl ProvisioningClient {
    pub fn new(service_url: impl Into<String>) -> Result<Self, ProvisionError> {
        let client = reqwest::Client::builder()
            .connect_timeout(HTTP_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            service_url: service_url.into(),
        })
    }

    /// Request a new quick tunnel and return its session config.
    ///
    /// Nothing is constructed unless the response decodes, reports success
    /// and carries a valid tunnel UUID, so no partial state can leak out.
    pub async fn request_tunnel(&self) -> Result<SessionConfig, ProvisionError> {
        info!("{}", DISCLAIMER);
        info!("Requesting new quick Tunnel on trycloudflare.com...");

        let response = self
            .client
            .post(format!("{}/tunnel", self.service_url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let data: TunnelResponse = response.json().await.map_err(ProvisionError::Decode)?;

        let result = match (data.success, data.result) {
            (true, Some(result)) => result,
            _ => {
                let err = data.errors.into_iter().next().unwrap_or(TunnelResponseError {
                    code: 0,
                    message: "provisioning service returned no result".to_string(),
                });
                return Err(ProvisionError::Service {
                    code: err.code,
                    message: err.message,
                });
            }
        };

        let tunnel_id =
            Uuid::parse_str(&result.id).map_err(|e| ProvisionError::InvalidTunnelId {
                id: result.id.clone(),
                source: e,
            })?;

        let url = normalize_url(&result.hostname);

        for line in ascii_box(
            &[
                "Your quick Tunnel has been created! Visit it at (it may take some time to be reachable):",
                &url,
            ],
            2,
        ) {
            info!("{}", line);
        }

        Ok(SessionConfig {
            url,
            credentials: Credentials {
                account_tag: result.account_tag,
                tunnel_secret: result.secret,
                tunnel_id,
                tunnel_name: result.name,
            },
        })
    }
}

/// Prepend `https://` unless the hostname already carries a scheme.
fn normalize_url(hostname: &str) -> String {
    if hostname.contains("://") {
        hostname.to_string()
    } else {
        format!("https://{hostname}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_hostname() {
        assert_eq!(
            normalize_url("abc.trycloudflare.com"),
            "https://abc.trycloudflare.com"
        );
    }

    #[test]
    fn test_normalize_keeps_existing_scheme() {
        assert_eq!(
            normalize_url("https://abc.trycloudflare.com"),
            "https://abc.trycloudflare.com"
        );
        assert_eq!(
            normalize_url("http://abc.trycloudflare.com"),
            "http://abc.trycloudflare.com"
        );
    }

    #[test]
    fn test_response_decoding() {
        let body = r#"{
            "success": true,
            "result": {
                "id": "6a184b56-74cf-48f4-9b9a-ba0a1a0cb5b8",
                "name": "quick",
                "hostname": "abc.trycloudflare.com",
                "account_tag": "acct",
                "secret": "c2VjcmV0"
            },
            "errors": []
        }"#;
        let data: TunnelResponse = serde_json::from_str(body).unwrap();
        assert!(data.success);
        let result = data.result.unwrap();
        assert_eq!(result.secret, b"secret");
        assert_eq!(result.account_tag, "acct");
    }

    #[test]
    fn test_error_response_decoding() {
        let body = r#"{
            "success": false,
            "result": null,
            "errors": [{"code": 1015, "message": "rate limited"}]
        }"#;
        let data: TunnelResponse = serde_json::from_str(body).unwrap();
        assert!(!data.success);
        assert!(data.result.is_none());
        assert_eq!(data.errors[0].code, 1015);
    }
}
