use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::{io, io::Write};
use thiserror::Error;

use crate::api::Environment;

/// The keyring service all of our entries live under.
const KEYRING_SERVICE: &str = "paypalctl";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unable to access credential storage: {0}")]
    Keyring(#[from] keyring::Error),
    #[error("stored credentials are malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unable to read from the terminal: {0}")]
    Io(#[from] io::Error),
}

/// The format of our JSON within credential storage.
///
/// Only the REST app's credentials are kept. Access tokens are never persisted.
#[derive(Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialStorage {
    pub client_id: String,
    pub client_secret: String,
}

impl CredentialStorage {
    pub fn from_json(contents: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(&self)?)
    }
}

impl std::fmt::Debug for CredentialStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStorage")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Sandbox and production apps have separate credentials, so each gets its own entry.
fn credentials_entry(environment: Environment) -> Result<Entry, StorageError> {
    let account = format!("{environment} REST credentials");
    Ok(Entry::new(KEYRING_SERVICE, &account)?)
}

/// Retrieves stored credentials for the given environment, if any exist.
pub fn load_credentials(
    environment: Environment,
) -> Result<Option<CredentialStorage>, StorageError> {
    let entry = credentials_entry(environment)?;
    match entry.get_password() {
        Ok(contents) => Ok(Some(CredentialStorage::from_json(&contents)?)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub fn store_credentials(
    environment: Environment,
    credentials: &CredentialStorage,
) -> Result<(), StorageError> {
    let entry = credentials_entry(environment)?;
    entry.set_password(&credentials.to_json()?)?;
    Ok(())
}

/// Quick function to read a line of input from the user.
pub fn interactive_prompt(prompt_type: &str) -> Result<String, StorageError> {
    let mut response = String::new();
    print!("Please enter {prompt_type} for your PayPal REST app: ");
    io::stdout().flush()?;
    io::stdin().read_line(&mut response)?;

    // Remove newline
    Ok(response.trim_end_matches(['\r', '\n']).to_string())
}

/// Interactively request the user for their client ID and secret, then store them.
pub fn request_credentials(environment: Environment) -> Result<CredentialStorage, StorageError> {
    let credentials = CredentialStorage {
        client_id: interactive_prompt("the client ID")?,
        client_secret: interactive_prompt("the client secret")?,
    };
    store_credentials(environment, &credentials)?;
    Ok(credentials)
}
