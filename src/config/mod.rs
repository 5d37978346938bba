//! Configuration module for the suno-downloader.
//!
//! This module handles:
//! - Locating and loading the YAML config file
//! - Writing the `--init` template
//! - Configuration validation

pub mod init;
pub mod loader;
pub mod source;
pub mod validation;

pub use init::{init_config, InitOutcome, CONFIG_TEMPLATE};
pub use loader::{
    config_search_paths, find_config_file, BitwardenConfig, Config, PlaylistEntry,
    CONFIG_FILE_NAME, DEFAULT_API_BASE, MAX_WAIT_SECONDS,
};
pub use source::AuthSource;
pub use validation::{
    parse_playlist_id, validate_config, validate_device_id, validate_playlists, validate_token,
};
