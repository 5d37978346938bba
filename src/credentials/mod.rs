//! Credential providers.
//!
//! The API needs a bearer token and a device ID. They are either read straight
//! from the config file or pulled from a Bitwarden vault item.

pub mod bitwarden;

use async_trait::async_trait;

use crate::config::{validate_device_id, validate_token, AuthSource, Config};
use crate::error::Result;

pub use bitwarden::BitwardenCredentials;

/// Resolved API credentials.
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    pub device_id: String,
}

impl Credentials {
    /// Check both values, reporting the first problem.
    pub fn validate(&self) -> Result<()> {
        validate_token(&self.token)?;
        validate_device_id(&self.device_id)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("device_id", &self.device_id)
            .finish()
    }
}

/// A source of API credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    async fn credentials(&self) -> Result<Credentials>;
}

/// Credentials taken from the config file (and CLI overrides).
pub struct ConfigCredentials {
    token: String,
    device_id: String,
}

impl ConfigCredentials {
    pub fn new(config: &Config) -> Self {
        Self {
            token: config.token.trim().to_string(),
            device_id: config.device_id.trim().to_string(),
        }
    }
}

#[async_trait]
impl CredentialProvider for ConfigCredentials {
    fn name(&self) -> &'static str {
        "config"
    }

    async fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            token: self.token.clone(),
            device_id: self.device_id.clone(),
        })
    }
}

/// Pick the provider named by `auth_source`.
pub fn provider_for(config: &Config) -> Box<dyn CredentialProvider> {
    match config.auth_source {
        AuthSource::Config => Box::new(ConfigCredentials::new(config)),
        AuthSource::Bitwarden => Box::new(BitwardenCredentials::new(
            config.bitwarden.item_name.clone(),
        )),
    }
}

/// Resolve and validate credentials for this run.
pub async fn resolve_credentials(config: &Config) -> Result<Credentials> {
    let provider = provider_for(config);
    tracing::debug!("Reading credentials from {}", provider.name());

    let credentials = provider.credentials().await?;
    credentials.validate()?;
    Ok(credentials)
}
