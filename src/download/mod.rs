//! Download module for playlist downloading.
//!
//! This module provides:
//! - Download state tracking
//! - Playlist downloading
//! - Single track downloading
//! - Retry with backoff

pub mod playlist;
pub mod retry;
pub mod state;
pub mod track;

pub use playlist::download_playlist;
pub use retry::{download_with_retry, RetryPolicy};
pub use state::{GlobalState, PlaylistState, TrackOutcome, TrackReport};
pub use track::{download_track, DownloadedFile, TrackJob};
