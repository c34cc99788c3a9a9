//! Exec-based tunnel connector
//!
//! Hands the session to an operator-configured external command. The
//! command receives the tunnel URL and credential material through its
//! environment and is expected to block for the lifetime of the tunnel;
//! exit status 0 means the session ended cleanly.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::process::Command;
use tracing::info;

use quicktun_session::{ConnectorError, SessionConfig, TunnelConnector};

pub struct ExecConnector {
    command: String,
    args: Vec<String>,
}

impl ExecConnector {
    pub fn new(command: String, args: Vec<String>) -> Self {
        Self { command, args }
    }
}

#[async_trait]
impl TunnelConnector for ExecConnector {
    async fn connect(&self, config: &SessionConfig) -> Result<(), ConnectorError> {
        info!(command = %self.command, "Starting tunnel connector");

        let status = Command::new(&self.command)
            .args(&self.args)
            .env("TUNNEL_URL", &config.url)
            .env("TUNNEL_ID", config.credentials.tunnel_id.to_string())
            .env("TUNNEL_NAME", &config.credentials.tunnel_name)
            .env("TUNNEL_ACCOUNT_TAG", &config.credentials.account_tag)
            .env("TUNNEL_SECRET", STANDARD.encode(&config.credentials.tunnel_secret))
            .status()
            .await
            .map_err(|e| {
                ConnectorError::new(format!("failed to spawn {}: {e}", self.command))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ConnectorError::new(format!(
                "{} exited with {status}",
                self.command
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quicktun_session::Credentials;
    use uuid::Uuid;

    fn sample_config() -> SessionConfig {
        SessionConfig {
            url: "https://abc.trycloudflare.com".to_string(),
            credentials: Credentials {
                account_tag: "acct".to_string(),
                tunnel_secret: vec![1, 2, 3],
                tunnel_id: Uuid::new_v4(),
                tunnel_name: "quick".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let connector = ExecConnector::new("true".to_string(), vec![]);
        assert!(connector.connect(&sample_config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_error() {
        let connector = ExecConnector::new("false".to_string(), vec![]);
        assert!(connector.connect(&sample_config()).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_command_is_error() {
        let connector = ExecConnector::new("quicktun-no-such-binary".to_string(), vec![]);
        assert!(connector.connect(&sample_config()).await.is_err());
    }
}
