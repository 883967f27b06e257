// Credential loading. The vendor's custom-integration page hands out a
// JSON file (`http-headers.json`) with the three values we need; we read it
// once and keep the result in memory.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const USERNAME_ENV: &str = "TBL_USERNAME";
pub const PASSWORD_ENV: &str = "TBL_PASSWORD";
pub const API_KEY_ENV: &str = "TBL_API_KEY";

/// Username, password and API key of a custom integration. Field names
/// follow the vendor's credential file.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "Username", default)]
    pub username: String,
    #[serde(rename = "Password", default)]
    pub password: String,
    #[serde(rename = "X-API-KEY", default)]
    pub api_key: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
            api_key: api_key.into(),
        }
    }

    /// Read and validate a credential file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            Error::config(format!(
                "failed to read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        let creds: Credentials = serde_json::from_slice(&data)
            .map_err(|e| Error::config(format!("failed to parse credentials file: {}", e)))?;
        creds.validate()?;
        Ok(creds)
    }

    /// Build credentials from `TBL_USERNAME`, `TBL_PASSWORD` and `TBL_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        let creds = Credentials::new(var(USERNAME_ENV), var(PASSWORD_ENV), var(API_KEY_ENV));
        creds.validate()?;
        Ok(creds)
    }

    /// All three values must be non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::config("username is empty"));
        }
        if self.password.is_empty() {
            return Err(Error::config("password is empty"));
        }
        if self.api_key.is_empty() {
            return Err(Error::config("API key is empty"));
        }
        Ok(())
    }

    /// Value for the `Authorization` header.
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
