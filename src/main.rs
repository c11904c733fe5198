//! Credential store - Entry Point
//!
//! Interactive user services: create, delete, list and update users, check a
//! password, or print the login page.

use log::info;
use std::process::ExitCode;

use credential_store::AppConfig;
use credential_store::cli::{self, Prompter};
use credential_store::error::AppError;
use credential_store::error::handlers::{error_to_exit_code, handle_error};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

async fn run(args: &[String]) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    info!(
        "Loaded configuration ({:?} backend, collection {})",
        config.backend, config.collection
    );

    let mut prompter = Prompter::stdio();
    cli::run(args, &config, &mut prompter).await
}
