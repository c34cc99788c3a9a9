//! Quick tunnel session library - Public API
//!
//! Provisions an ephemeral, unauthenticated quick tunnel, persists its
//! credentials, announces the public URL to a local callback listener and
//! hands off to a tunnel connector.

pub mod backoff;
pub mod banner;
pub mod callback;
pub mod connector;
pub mod model;
pub mod provision;
pub mod session;
pub mod store;

pub use backoff::{Backoff, BackoffConfig};
pub use banner::ascii_box;
pub use callback::{CallbackError, CallbackNotifier};
pub use connector::{ConnectorError, TunnelConnector};
pub use model::{Credentials, SessionConfig};
pub use provision::{ProvisionError, ProvisioningClient};
pub use session::{SessionError, SessionOrchestrator, SessionSettings};
pub use store::{ConfigStore, StoreError};
