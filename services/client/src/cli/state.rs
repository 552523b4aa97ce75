//! services/client/src/cli/state.rs
//!
//! Defines the application state shared by every command.

use crate::adapters::{JsonFileStorage, ReqwestTransport};
use crate::config::Config;
use crate::error::ClientError;
use book_review_core::ports::{HttpTransport, KeyValueStorage};
use book_review_core::{CredentialStore, Gateway};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all commands.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credentials: CredentialStore,
    pub gateway: Gateway,
}

impl AppState {
    /// Opens the session file and builds the HTTP transport described by `config`.
    pub fn new(config: Arc<Config>) -> Result<Self, ClientError> {
        let storage = Arc::new(JsonFileStorage::open(config.session_file.clone())?);
        let transport = Arc::new(ReqwestTransport::new(config.api_base_url.clone())?);
        Ok(Self::with_parts(config, storage, transport))
    }

    pub fn with_parts(
        config: Arc<Config>,
        storage: Arc<dyn KeyValueStorage>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let credentials = CredentialStore::new(storage);
        let gateway = Gateway::new(transport, credentials.clone());
        Self {
            config,
            credentials,
            gateway,
        }
    }
}
