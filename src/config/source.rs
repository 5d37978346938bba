//! Credential source definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the bearer token and device ID are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthSource {
    /// `token` and `device_id` keys of the config file (default).
    #[default]
    Config,
    /// Custom fields of a Bitwarden vault item.
    Bitwarden,
}

impl fmt::Display for AuthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthSource::Config => write!(f, "config"),
            AuthSource::Bitwarden => write!(f, "bitwarden"),
        }
    }
}

impl FromStr for AuthSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "config" => Ok(AuthSource::Config),
            "bitwarden" | "bw" => Ok(AuthSource::Bitwarden),
            _ => Err(format!("Unknown auth source: {}", s)),
        }
    }
}
