//! Session orchestration
//!
//! Single pass per process run: resume the persisted session if its config
//! file exists, otherwise provision a new tunnel, announce it to the local
//! callback listener, persist it, and in either case hand the session to the
//! tunnel connector.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::callback::{CallbackError, CallbackNotifier};
use crate::connector::{ConnectorError, TunnelConnector};
use crate::provision::{ProvisionError, ProvisioningClient};
use crate::store::{ConfigStore, StoreError};

/// Session orchestration errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Callback(#[from] CallbackError),

    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// A resumed session's connector failed; the stale config has been
    /// deleted and the next run will provision a fresh tunnel.
    #[error("Failed to start tunnel from stored credentials. Restart to create a new tunnel.")]
    RestartRequired {
        #[source]
        source: ConnectorError,
    },
}

/// Where the callback listener lives.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Base URL of the local server the callback listener runs on.
    pub local_base_url: String,
    /// Path of the callback endpoint, relative to `local_base_url`.
    pub callback_path: String,
}

/// Drives one quick tunnel session from credentials to a running connector.
pub struct SessionOrchestrator<C> {
    store: ConfigStore,
    provisioner: ProvisioningClient,
    notifier: CallbackNotifier,
    connector: C,
    settings: SessionSettings,
}

impl<C: TunnelConnector> SessionOrchestrator<C> {
    pub fn new(
        store: ConfigStore,
        provisioner: ProvisioningClient,
        notifier: CallbackNotifier,
        connector: C,
        settings: SessionSettings,
    ) -> Self {
        Self {
            store,
            provisioner,
            notifier,
            connector,
            settings,
        }
    }

    /// Run the session to completion.
    ///
    /// Fresh path (no stored config): provision, announce the URL, persist,
    /// connect. The config is only written after the callback succeeds, so
    /// an announce failure never leaves a stale file behind. A connector
    /// failure keeps the freshly written file for inspection.
    ///
    /// Resumed path (stored config present): load and connect. A connector
    /// failure deletes the stale config and returns `RestartRequired`; the
    /// connector may hold process-lifetime resources, so re-provisioning
    /// happens on the next run rather than in-process.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<(), SessionError> {
        info!(path = %self.store.path().display(), "Using config file");

        let resumed = self.store.exists()?;
        let config = if resumed {
            self.store.load()?
        } else {
            let config = self.provisioner.request_tunnel().await?;

            info!("Notifying server of changed tunnel");
            self.notifier
                .notify(
                    &self.settings.local_base_url,
                    &self.settings.callback_path,
                    &config.url,
                    cancel,
                )
                .await?;

            self.store.save(&config)?;
            config
        };

        info!(url = %config.url, "Using tunnel");

        match self.connector.connect(&config).await {
            Ok(()) => Ok(()),
            Err(e) if resumed => {
                error!(error = %e, "Stored session failed to start, deleting stale config");
                self.store.delete()?;
                Err(SessionError::RestartRequired { source: e })
            }
            Err(e) => Err(e.into()),
        }
    }
}
