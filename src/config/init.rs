//! Config file scaffolding for `--init`.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Placeholder written for the token in a fresh config.
pub const TOKEN_PLACEHOLDER: &str = "REPLACE_WITH_YOUR_BEARER_TOKEN";

/// Placeholder written for the device ID in a fresh config.
pub const DEVICE_ID_PLACEHOLDER: &str = "REPLACE_WITH_YOUR_DEVICE_ID";

/// Commented template written by `--init`.
pub const CONFIG_TEMPLATE: &str = r#"# Suno Downloader Configuration
# DO NOT commit this file with real credentials!

# Authentication
#   config:    read token/device_id below
#   bitwarden: read the 'token' and 'device_id' fields of a vault item
auth_source: config
token: "REPLACE_WITH_YOUR_BEARER_TOKEN"
device_id: "REPLACE_WITH_YOUR_DEVICE_ID"

# Bitwarden settings (if auth_source: bitwarden)
bitwarden:
  item_name: "Suno API"
  # Set BW_SESSION (output of 'bw unlock --raw') before running

# Downloader behavior
download_workers: 4
output_root: "./downloads"

# Playlist IDs or URLs (overridden by command-line arguments)
playlists: []
  # - id: "f1485f8c-c27f-4bb9-bc8e-aff0665715df"
  # - "https://suno.com/playlist/f1485f8c-c27f-4bb9-bc8e-aff0665715df"

# Retry & timeouts
http_timeout_seconds: 30
download_retry_attempts: 3
download_retry_backoff_seconds: 2

# Manifests written next to the downloaded files
manifest_json: true
manifest_csv: true

# Rate limiting
delay_between_downloads_seconds: 0.5
"#;

/// Outcome of [`init_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    Overwritten,
    Kept,
}

/// Write the config template to `path`.
///
/// An existing file is only replaced when `force` is set or `confirm_overwrite`
/// returns true.
pub fn init_config<F>(path: &Path, force: bool, confirm_overwrite: F) -> Result<InitOutcome>
where
    F: FnOnce(&Path) -> Result<bool>,
{
    let existed = path.exists();

    if existed && !force && !confirm_overwrite(path)? {
        tracing::debug!("Keeping existing config at {}", path.display());
        return Ok(InitOutcome::Kept);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, CONFIG_TEMPLATE).map_err(|e| {
        Error::Config(format!("Failed to write {}: {}", path.display(), e))
    })?;

    Ok(if existed {
        InitOutcome::Overwritten
    } else {
        InitOutcome::Created
    })
}
