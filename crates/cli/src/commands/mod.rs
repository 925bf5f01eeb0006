//! Subcommand implementations.

pub mod auth;
pub mod products;
pub mod sell;

use std::sync::Arc;

use tillpoint_client::{ApiClient, ClientConfig, FileTokenStore, Session};

/// Build a client whose session is restored from the configured session file.
pub fn connect() -> Result<ApiClient, Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let store = FileTokenStore::new(config.session_file.clone());
    let session = Session::restore(Arc::new(store))?;
    Ok(ApiClient::new(&config, session)?)
}

/// Write a line of command output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(line: impl std::fmt::Display) {
    println!("{line}");
}
