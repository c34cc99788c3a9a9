//! Tunnel connector boundary
//!
//! The connector owns the actual connection to the tunneling edge. This
//! crate only decides when to invoke it and what to do when it fails; its
//! internals, including the wire protocol, live elsewhere.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::SessionConfig;

/// Opaque failure reported by a tunnel connector.
#[derive(Debug, Error)]
#[error("Tunnel connector failed: {0}")]
pub struct ConnectorError(String);

impl ConnectorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Establishes and maintains the tunnel connection for a session.
///
/// `connect` blocks until the tunnel session ends or fails to start. A
/// connector may hold process-lifetime resources, so callers must not
/// assume it is safe to invoke twice in one process.
#[async_trait]
pub trait TunnelConnector {
    async fn connect(&self, config: &SessionConfig) -> Result<(), ConnectorError>;
}
