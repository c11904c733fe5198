//! Subcommand handlers
//!
//! Each handler prompts for the fields it needs and calls exactly one
//! credential store operation. Answers are passed through unvalidated; blank
//! answers to optional questions are left out.

use log::{info, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::cli::parser::{CliCommand, usage};
use crate::cli::prompt::Prompter;
use crate::error::AppError;
use crate::login::render_login;
use crate::users::{AttributeChanges, Attributes, CredentialStore};

const USERNAME_PROMPT: &str = "Username (required): ";
const PASSWORD_PROMPT: &str = "Password (required): ";
const REALNAME_PROMPT: &str = "Real Name: ";
const EMAIL_PROMPT: &str = "Email: ";

/// Runs one subcommand against the store.
///
/// `default_login_page` is used by `--loginpage` when no path is given on the
/// command line.
pub async fn handle_command<R, W>(
    command: CliCommand,
    store: &CredentialStore,
    prompter: &mut Prompter<R, W>,
    default_login_page: Option<&Path>,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match command {
        CliCommand::CreateUser => handle_create_user(store, prompter).await,
        CliCommand::DeleteUser => handle_delete_user(store, prompter).await,
        CliCommand::ListUsers => handle_list_users(store, prompter).await,
        CliCommand::UpdateUser => handle_update_user(store, prompter).await,
        CliCommand::Authenticate => handle_authenticate(store, prompter).await,
        CliCommand::LoginPage(path) => {
            let path = path.map(PathBuf::from);
            let path = path.as_deref().or(default_login_page);
            handle_login_page(path, prompter).await
        }
        CliCommand::Usage => Ok(prompter.say(usage()).await?),
    }
}

async fn handle_create_user<R, W>(
    store: &CredentialStore,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let username = prompter.ask(USERNAME_PROMPT).await?;
    let realname = prompter.ask(REALNAME_PROMPT).await?;
    let email = prompter.ask(EMAIL_PROMPT).await?;
    let password = prompter.ask(PASSWORD_PROMPT).await?;

    let mut attributes = Attributes::new();
    for (key, value) in [("realname", realname), ("email", email)] {
        if !value.is_empty() {
            attributes.insert(key.to_string(), Value::String(value));
        }
    }

    if store.create_user(&username, &password, attributes).await? {
        info!("User {} created", username);
    } else {
        warn!("User {} already exists", username);
    }
    Ok(())
}

async fn handle_delete_user<R, W>(
    store: &CredentialStore,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let username = prompter.ask(USERNAME_PROMPT).await?;
    match store.delete_user(Some(&username), None).await? {
        Some(user) => prompter.say(&serde_json::to_string(&user)?).await?,
        None => warn!("User {} not found", username),
    }
    Ok(())
}

async fn handle_list_users<R, W>(
    store: &CredentialStore,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for user in store.get_users().await? {
        prompter.say(&serde_json::to_string(&user)?).await?;
    }
    Ok(())
}

async fn handle_update_user<R, W>(
    store: &CredentialStore,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let username = prompter.ask(USERNAME_PROMPT).await?;
    let realname = prompter.ask(REALNAME_PROMPT).await?;
    let email = prompter.ask(EMAIL_PROMPT).await?;
    let password = prompter.ask("Password (blank to keep): ").await?;

    let mut changes = AttributeChanges::new();
    for (key, value) in [("realname", realname), ("email", email), ("password", password)] {
        if !value.is_empty() {
            changes = changes.set(key, value);
        }
    }

    if store.update_user(&username, &changes).await? {
        info!("User {} updated", username);
    } else {
        warn!("User {} not found", username);
    }
    Ok(())
}

async fn handle_authenticate<R, W>(
    store: &CredentialStore,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let username = prompter.ask(USERNAME_PROMPT).await?;
    let password = prompter.ask(PASSWORD_PROMPT).await?;
    let ok = store.authenticate(&username, &password).await?;
    prompter.say(if ok { "authenticated" } else { "rejected" }).await?;
    Ok(())
}

async fn handle_login_page<R, W>(
    path: Option<&Path>,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let html = render_login(path).await?;
    prompter.say(&html).await?;
    Ok(())
}
