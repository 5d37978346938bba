//! Configuration structures and loading logic.

use crate::config::source::AuthSource;
use crate::error::{Error, Result};
use directories::BaseDirs;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default file name searched for in the working directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Production API endpoint.
pub const DEFAULT_API_BASE: &str = "https://studio-api.prod.suno.com";

/// Upper bound for configured waits, in seconds.
pub const MAX_WAIT_SECONDS: f64 = 3600.0;

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Where credentials come from.
    #[serde(default)]
    pub auth_source: AuthSource,

    /// Bearer token copied from the browser.
    #[serde(default)]
    pub token: String,

    /// Value of the `device-id` request header.
    #[serde(default)]
    pub device_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub bitwarden: BitwardenConfig,

    /// Maximum number of files downloaded at once.
    #[serde(default = "default_workers")]
    pub download_workers: usize,

    /// Base directory for playlist folders.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Playlists processed when none are given on the command line.
    #[serde(default, deserialize_with = "null_as_default")]
    pub playlists: Vec<PlaylistEntry>,

    #[serde(default = "default_timeout")]
    pub http_timeout_seconds: u64,

    /// Total attempts per file, including the first.
    #[serde(default = "default_retry_attempts")]
    pub download_retry_attempts: u32,

    /// Base wait between attempts; attempt `n` waits `n` times this.
    #[serde(default = "default_retry_backoff")]
    pub download_retry_backoff_seconds: f64,

    #[serde(default = "default_true")]
    pub manifest_json: bool,

    #[serde(default = "default_true")]
    pub manifest_csv: bool,

    /// Pause between consecutive download URL requests.
    #[serde(default = "default_delay")]
    pub delay_between_downloads_seconds: f64,

    /// Whether to draw progress bars.
    #[serde(default = "default_true")]
    pub show_progress: bool,

    #[serde(default = "default_api_base")]
    pub api_base: String,
}

/// Bitwarden lookup settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BitwardenConfig {
    /// Name of the vault item carrying `token` and `device_id` fields.
    #[serde(default = "default_item_name")]
    pub item_name: String,
}

impl Default for BitwardenConfig {
    fn default() -> Self {
        Self {
            item_name: default_item_name(),
        }
    }
}

/// A playlist reference, either `- <id>` or `- id: <id>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PlaylistEntry {
    Id(String),
    Detailed { id: String },
}

impl PlaylistEntry {
    /// The raw identifier (or URL) as written in the file.
    pub fn id(&self) -> &str {
        match self {
            PlaylistEntry::Id(id) => id,
            PlaylistEntry::Detailed { id } => id,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_workers() -> usize {
    4
}

fn default_output_root() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_timeout() -> u64 {
    30
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff() -> f64 {
    2.0
}

fn default_delay() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_item_name() -> String {
    "Suno API".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_source: AuthSource::default(),
            token: String::new(),
            device_id: String::new(),
            bitwarden: BitwardenConfig::default(),
            download_workers: default_workers(),
            output_root: default_output_root(),
            playlists: Vec::new(),
            http_timeout_seconds: default_timeout(),
            download_retry_attempts: default_retry_attempts(),
            download_retry_backoff_seconds: default_retry_backoff(),
            manifest_json: true,
            manifest_csv: true,
            delay_between_downloads_seconds: default_delay(),
            show_progress: true,
            api_base: default_api_base(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::MissingConfig(format!(
                    "{} does not exist. Create one with: suno-downloader --init",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(Error::Config(
                "Configuration file is empty. Create one with: suno-downloader --init".into(),
            ));
        }

        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Raw playlist identifiers in file order.
    pub fn playlist_ids(&self) -> Vec<String> {
        self.playlists.iter().map(|p| p.id().to_string()).collect()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn download_delay(&self) -> Duration {
        wait_duration(self.delay_between_downloads_seconds)
    }

    pub fn retry_backoff(&self) -> Duration {
        wait_duration(self.download_retry_backoff_seconds)
    }
}

/// Seconds from the config as a wait, clamped to `0..=MAX_WAIT_SECONDS`.
/// NaN becomes zero.
fn wait_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds.clamp(0.0, MAX_WAIT_SECONDS)).unwrap_or(Duration::ZERO)
}

/// Candidate config locations, in search order.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(CONFIG_FILE_NAME));
    }

    if let Some(dirs) = BaseDirs::new() {
        let home = dirs.home_dir();
        paths.push(
            home.join(".config")
                .join("suno-downloader")
                .join(CONFIG_FILE_NAME),
        );
        paths.push(home.join(".suno-downloader.yaml"));
    }

    paths
}

/// Resolve which config file to use.
///
/// An explicit path must exist; otherwise the standard locations are searched.
pub fn find_config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(Error::MissingConfig(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    config_search_paths()
        .into_iter()
        .find(|p| p.exists())
        .ok_or_else(|| {
            Error::MissingConfig(
                "No config.yaml found. Create one with: suno-downloader --init".to_string(),
            )
        })
}
