//! CLI command implementations.

pub mod categories;
pub mod products;
pub mod session;

use std::sync::Arc;

use thiserror::Error;

use backroom_client::config::{ClientConfig, ConfigError};
use backroom_client::nav::NoopNavigator;
use backroom_client::session::SessionManager;
use backroom_client::storage::FileStore;
use backroom_core::ParseStatusError;

/// Default session store file, relative to the working directory.
const DEFAULT_SESSION_FILE: &str = ".backroom-session.json";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The backend could not be reached.
    #[error("client error: {0}")]
    Client(#[from] backroom_client::ClientError),

    /// A status filter did not parse.
    #[error(transparent)]
    InvalidStatus(#[from] ParseStatusError),
}

/// Build a session manager backed by the file session store.
///
/// The CLI has no browser to navigate, so the navigator is a no-op; auth
/// failures surface as statuses on the command output instead.
pub fn open_session() -> Result<SessionManager, CliError> {
    let config = ClientConfig::from_env()?;

    let store_path = std::env::var("BACKROOM_SESSION_FILE")
        .unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_owned());
    let store = Arc::new(FileStore::open(store_path));

    Ok(SessionManager::new(&config, store, Arc::new(NoopNavigator)))
}
