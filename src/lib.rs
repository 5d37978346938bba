//! Suno Downloader - bulk audio downloads for Suno playlists
//!
//! This library fetches playlists from the Suno studio API and saves every
//! track's audio into a per-playlist folder.
//!
//! # Features
//!
//! - YAML configuration with `--init` scaffolding
//! - Credentials from the config file or a Bitwarden vault item
//! - Signed download URLs with fallback to the public audio URL
//! - Concurrent downloads with retry and backoff
//! - Skipping of tracks already on disk
//! - JSON and CSV manifests per playlist
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use suno_downloader::{credentials::resolve_credentials, download_playlist, output, Config, SunoApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.yaml"))?;
//!     let credentials = resolve_credentials(&config).await?;
//!     let api = SunoApi::new(&config.api_base, credentials, config.http_timeout())?;
//!
//!     let progress = output::create_multi_progress(true);
//!     for id in config.playlist_ids() {
//!         let state = download_playlist(&api, &config, &id, &progress).await?;
//!         println!("{}: {} downloaded", state.title, state.downloaded_count);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod download;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod output;
pub mod track;

// Re-exports for convenience
pub use api::SunoApi;
pub use config::Config;
pub use download::{download_playlist, GlobalState, PlaylistState};
pub use error::{Error, Result};
pub use track::{Playlist, Track};
