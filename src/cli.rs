//! Command-line argument definitions and dispatch for `paypalctl`.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::{fs, io, path::PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::{
    api::{ApiError, ClientConfig, Environment, OrderResponse, PaypalClient, Transport},
    storage::{self, CredentialStorage, StorageError},
};

/// Talk to PayPal's Orders API from the terminal.
#[derive(Parser, Debug)]
#[command(name = "paypalctl")]
#[command(version)]
#[command(about = "Create, inspect, patch and capture PayPal orders")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// PayPal environment to use (`sandbox` or `production`).
    #[arg(short, long, global = true, env = "PAYPAL_ENVIRONMENT", default_value = "sandbox")]
    pub environment: String,

    /// REST app client ID. Falls back to the keyring when unset.
    #[arg(long, global = true, env = "PAYPAL_CLIENT_ID")]
    pub client_id: Option<String>,

    /// REST app client secret. Falls back to the keyring when unset.
    #[arg(long, global = true, env = "PAYPAL_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store REST app credentials in the system keyring.
    Login,

    /// Create an order.
    Create {
        /// Order payload as inline JSON, or `@path` to read it from a file.
        payload: String,
    },

    /// Show details for an order.
    Get { order_id: String },

    /// Update an order with a JSON Patch document.
    Patch {
        order_id: String,
        /// Patch operations as inline JSON, or `@path` to read them from a file.
        patch: String,
    },

    /// Capture payment for an approved order.
    Capture { order_id: String },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("no credentials for {0}; run `paypalctl login` or pass --client-id and --client-secret")]
    MissingCredentials(Environment),
    #[error("{0} was given without its pair; pass both --client-id and --client-secret")]
    PartialCredentials(&'static str),
    #[error("unable to read {path}: {source}")]
    ReadPayload { path: PathBuf, source: io::Error },
    #[error("payload is not valid JSON: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

/// Parses a payload argument: inline JSON, or `@path` pointing at a JSON file.
pub fn parse_payload(argument: &str) -> Result<Value, CliError> {
    let contents = match argument.strip_prefix('@') {
        Some(path) => {
            let path = PathBuf::from(path);
            fs::read_to_string(&path).map_err(|source| CliError::ReadPayload { path, source })?
        }
        None => argument.to_string(),
    };
    serde_json::from_str(&contents).map_err(CliError::InvalidPayload)
}

/// Flags and environment variables win; otherwise we look in the keyring.
/// A lone ID or secret is an error rather than being silently ignored.
fn resolve_credentials(
    cli: &Cli,
    environment: Environment,
) -> Result<CredentialStorage, CliError> {
    match (&cli.client_id, &cli.client_secret) {
        (Some(client_id), Some(client_secret)) => Ok(CredentialStorage {
            client_id: client_id.clone(),
            client_secret: client_secret.clone(),
        }),
        (Some(_), None) => Err(CliError::PartialCredentials("--client-id")),
        (None, Some(_)) => Err(CliError::PartialCredentials("--client-secret")),
        (None, None) => {
            debug!(%environment, "loading credentials from keyring");
            storage::load_credentials(environment)?
                .ok_or(CliError::MissingCredentials(environment))
        }
    }
}

/// Runs a single order command against the given client.
pub async fn run_order_command<T: Transport>(
    client: &mut PaypalClient<T>,
    command: &Command,
) -> Result<Option<OrderResponse>, CliError> {
    let response = match command {
        Command::Login => return Ok(None),
        Command::Create { payload } => client.create_order(&parse_payload(payload)?).await?,
        Command::Get { order_id } => client.get_order(order_id).await?,
        Command::Patch { order_id, patch } => {
            client.patch_order(&parse_payload(patch)?, order_id).await?
        }
        Command::Capture { order_id } => client.capture_order(order_id).await?,
    };
    Ok(Some(response))
}

/// Executes the parsed command line, printing any response as JSON.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let environment: Environment = cli.environment.parse()?;

    if let Command::Login = cli.command {
        storage::request_credentials(environment)?;
        println!("Stored credentials for {environment}.");
        return Ok(());
    }

    let credentials = resolve_credentials(&cli, environment)?;
    let config = ClientConfig::for_environment(
        environment,
        credentials.client_id,
        credentials.client_secret,
    );
    let mut client = PaypalClient::new(config);

    if let Some(response) = run_order_command(&mut client, &cli.command).await? {
        // Serializing a `Value` cannot fail.
        let pretty = serde_json::to_string_pretty(&response).unwrap_or_default();
        println!("{pretty}");
    }
    Ok(())
}
