// Client configuration. Options are applied in order and the first one
// that fails aborts construction, so a half-built config never escapes.

use crate::credentials::Credentials;
use crate::error::Result;
use std::path::PathBuf;

/// A single configuration step.
#[derive(Debug, Clone)]
pub enum ConfigOption {
    /// Load credentials from the vendor's JSON credential file.
    CredentialFile(PathBuf),
    /// Use credentials already held in memory.
    Credentials(Credentials),
    /// Read credentials from the `TBL_*` environment variables.
    CredentialsFromEnv,
    /// Toggle debug log lines during uploads.
    Debug(bool),
}

impl ConfigOption {
    fn apply(self, config: &mut ClientConfig) -> Result<()> {
        match self {
            ConfigOption::CredentialFile(path) => {
                config.credentials = Credentials::from_file(path)?;
            }
            ConfigOption::Credentials(creds) => {
                creds.validate()?;
                config.credentials = creds;
            }
            ConfigOption::CredentialsFromEnv => {
                config.credentials = Credentials::from_env()?;
            }
            ConfigOption::Debug(debug) => config.debug = debug,
        }
        Ok(())
    }
}

/// Credentials plus the debug flag, fixed for the lifetime of a client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    credentials: Credentials,
    debug: bool,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}

/// Apply `options` in sequence and return the resulting configuration.
pub fn load_config<I>(options: I) -> Result<ClientConfig>
where
    I: IntoIterator<Item = ConfigOption>,
{
    let mut config = ClientConfig::default();
    for opt in options {
        opt.apply(&mut config)?;
    }
    Ok(config)
}

/// Chained form of [`load_config`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    options: Vec<ConfigOption>,
}

impl ClientConfigBuilder {
    pub fn credential_file(self, path: impl Into<PathBuf>) -> Self {
        self.option(ConfigOption::CredentialFile(path.into()))
    }

    pub fn credentials(self, creds: Credentials) -> Self {
        self.option(ConfigOption::Credentials(creds))
    }

    pub fn credentials_from_env(self) -> Self {
        self.option(ConfigOption::CredentialsFromEnv)
    }

    pub fn debug(self, debug: bool) -> Self {
        self.option(ConfigOption::Debug(debug))
    }

    pub fn option(mut self, opt: ConfigOption) -> Self {
        self.options.push(opt);
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        load_config(self.options)
    }
}
