//! Credential file storage.
//!
//! Persists the bearer token between runs as plain JSON under the platform
//! config directory (`~/.config/appetit/credentials.json` on Linux).
//!
//! Does NOT:
//! - Validate or refresh tokens
//! - Handle encryption (plaintext JSON storage)
//!
//! The file should carry restrictive permissions; the store itself does
//! not enforce them.

use appetit_core::error::{AppetitError, Result};
use appetit_core::user::Token;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "appetit";
const CREDENTIALS_FILE: &str = "credentials.json";

/// What the credentials file holds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoredCredentials {
    /// Bearer token from a completed login, if any.
    pub bearer_token: Option<Token>,
    /// The email the token was issued for.
    pub email: Option<String>,
}

/// Load/save access to the credentials file.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store at the default platform config path.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the platform config directory cannot
    /// be determined.
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppetitError::config("could not determine config directory"))?;
        Ok(Self {
            path: config_dir.join(CONFIG_DIR).join(CREDENTIALS_FILE),
        })
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads stored credentials. A missing file is not an error; it reads
    /// as empty credentials.
    pub fn load(&self) -> Result<StoredCredentials> {
        if !self.path.exists() {
            return Ok(StoredCredentials::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let credentials = serde_json::from_str(&content)?;
        Ok(credentials)
    }

    /// Writes credentials, creating parent directories as needed.
    pub fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(credentials)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Deletes the credentials file if it exists.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Returns the path to the credentials file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
