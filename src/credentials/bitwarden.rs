//! Bitwarden CLI credential lookup.

use std::collections::HashMap;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::credentials::{CredentialProvider, Credentials};
use crate::error::{Error, Result};

/// Environment variable holding an unlocked vault session key.
pub const SESSION_ENV: &str = "BW_SESSION";

/// A vault item as printed by `bw list items`.
#[derive(Debug, Deserialize)]
struct BwItem {
    name: String,
    #[serde(default)]
    fields: Option<Vec<BwField>>,
}

/// A custom field on a vault item.
#[derive(Debug, Deserialize)]
struct BwField {
    name: String,
    value: Option<String>,
}

/// Reads `token` and `device_id` custom fields from a vault item.
pub struct BitwardenCredentials {
    item_name: String,
    program: String,
}

impl BitwardenCredentials {
    pub fn new(item_name: String) -> Self {
        Self {
            item_name,
            program: "bw".to_string(),
        }
    }

    /// Use a different executable instead of `bw` on `PATH`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn list_items(&self) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["list", "items", "--search", self.item_name.as_str()]);

        if let Ok(session) = std::env::var(SESSION_ENV) {
            if !session.is_empty() {
                cmd.args(["--session", session.as_str()]);
            }
        }

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::BitwardenNotFound
                } else {
                    Error::Bitwarden(format!("Failed to run bw: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Bitwarden(format!(
                "bw exited with {} ({}). Unlock the vault with 'bw unlock' and export {}.",
                output.status,
                stderr.trim(),
                SESSION_ENV
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| Error::Bitwarden(format!("bw output is not UTF-8: {}", e)))
    }
}

#[async_trait]
impl CredentialProvider for BitwardenCredentials {
    fn name(&self) -> &'static str {
        "bitwarden"
    }

    async fn credentials(&self) -> Result<Credentials> {
        let listing = self.list_items().await?;
        credentials_from_listing(&listing, &self.item_name)
    }
}

/// Find the named item in `bw list items` output and read its fields.
pub fn credentials_from_listing(listing: &str, item_name: &str) -> Result<Credentials> {
    let items: Vec<BwItem> = serde_json::from_str(listing)?;

    // --search is fuzzy, so require an exact name match
    let item = items
        .into_iter()
        .find(|it| it.name == item_name)
        .ok_or_else(|| Error::Bitwarden(format!("Bitwarden item '{}' not found", item_name)))?;

    let fields: HashMap<String, String> = item
        .fields
        .unwrap_or_default()
        .into_iter()
        .filter_map(|f| f.value.map(|v| (f.name, v)))
        .collect();

    let field = |name: &str| {
        fields
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .ok_or_else(|| {
                Error::Bitwarden(format!(
                    "Bitwarden item '{}' is missing the '{}' field",
                    item_name, name
                ))
            })
    };

    Ok(Credentials {
        token: field("token")?,
        device_id: field("device_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"[
        {"id": "1", "name": "Suno API (old)", "fields": [{"name": "token", "value": "stale", "type": 0}]},
        {"id": "2", "name": "Suno API", "fields": [
            {"name": "token", "value": "abc.def.ghi", "type": 0},
            {"name": "device_id", "value": "dev-42", "type": 0}
        ]}
    ]"#;

    #[test]
    fn test_exact_item_match() {
        let creds = credentials_from_listing(LISTING, "Suno API").unwrap();
        assert_eq!(creds.token, "abc.def.ghi");
        assert_eq!(creds.device_id, "dev-42");
    }

    #[test]
    fn test_item_not_found() {
        let err = credentials_from_listing(LISTING, "Other").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_missing_field() {
        let err = credentials_from_listing(LISTING, "Suno API (old)").unwrap_err();
        assert!(err.to_string().contains("device_id"));
    }

    #[test]
    fn test_item_without_fields() {
        let listing = r#"[{"id": "3", "name": "Suno API", "fields": null}]"#;
        assert!(credentials_from_listing(listing, "Suno API").is_err());
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let provider = BitwardenCredentials::new("Suno API".to_string())
            .with_program("definitely-not-a-real-bw-binary");
        let err = provider.credentials().await.unwrap_err();
        assert!(matches!(err, Error::BitwardenNotFound));
    }
}
