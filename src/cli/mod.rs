//! Command-line user services
//!
//! Parses the subcommand, wires a credential store from configuration and
//! hands off to the matching handler.

pub mod handlers;
pub mod parser;
pub mod prompt;

pub use handlers::handle_command;
pub use parser::{CliCommand, parse_args, usage};
pub use prompt::Prompter;

use log::debug;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::config::{AppConfig, StoreBackend};
use crate::document::{DocumentClient, JsonFileClient, MemoryClient};
use crate::error::{AppError, UserError};
use crate::hashing::BcryptHasher;
use crate::users::CredentialStore;

/// Builds an unbound credential store from configuration.
pub fn build_store(config: &AppConfig) -> Result<CredentialStore, AppError> {
    let client: Arc<dyn DocumentClient> = match config.backend {
        StoreBackend::Json => Arc::new(JsonFileClient::new(config.data_dir_path())),
        StoreBackend::Memory => Arc::new(MemoryClient::new()),
    };
    let hasher = BcryptHasher::new(config.hash_cost).map_err(UserError::from)?;
    debug!(
        "Using {:?} backend with work factor {}",
        config.backend,
        hasher.cost()
    );
    Ok(CredentialStore::new(client, Arc::new(hasher)))
}

/// Runs the subcommand selected by `args`.
pub async fn run<R, W>(
    args: &[String],
    config: &AppConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let command = parse_args(args);
    let mut store = build_store(config)?;
    if command.needs_store() {
        store.initialize(&config.collection).await?;
    }
    let login_page = config.login_page_path();
    handle_command(command, &store, prompter, login_page.as_deref()).await
}
