//! Download state tracking.

use std::path::PathBuf;

use crate::manifest::{ManifestEntry, ManifestStatus};
use crate::track::Track;

/// What happened to one track.
#[derive(Debug, Clone)]
pub enum TrackOutcome {
    /// Fetched and written to `path`.
    Downloaded {
        path: PathBuf,
        url: String,
        bytes: u64,
    },
    /// A finished file was already present.
    Skipped { path: PathBuf },
    /// No URL could be resolved or every attempt failed.
    Failed { error: String },
}

/// Result for one track, tagged with its playlist position.
#[derive(Debug, Clone)]
pub struct TrackReport {
    pub index: usize,
    pub track: Track,
    pub outcome: TrackOutcome,
}

/// Per-playlist download state.
#[derive(Debug, Default)]
pub struct PlaylistState {
    pub playlist_id: String,
    pub title: String,
    pub folder: Option<PathBuf>,

    // Statistics
    pub track_count: u64,
    pub downloaded_count: u64,
    pub skipped_count: u64,
    pub failed_count: u64,
    pub bytes_downloaded: u64,

    /// Manifest rows in playlist order.
    pub entries: Vec<ManifestEntry>,
}

impl PlaylistState {
    pub fn new(playlist_id: String, title: String, folder: PathBuf) -> Self {
        Self {
            playlist_id,
            title,
            folder: Some(folder),
            ..Default::default()
        }
    }

    /// Fold a batch of track reports into the counters and manifest.
    pub fn record_all(&mut self, mut reports: Vec<TrackReport>) {
        reports.sort_by_key(|r| r.index);
        for report in reports {
            self.record(report);
        }
    }

    /// Record the outcome of one track.
    pub fn record(&mut self, report: TrackReport) {
        let TrackReport { track, outcome, .. } = report;

        let (status, path, url) = match outcome {
            TrackOutcome::Downloaded { path, url, bytes } => {
                self.downloaded_count += 1;
                self.bytes_downloaded += bytes;
                (ManifestStatus::Downloaded, path, url)
            }
            TrackOutcome::Skipped { path } => {
                self.skipped_count += 1;
                (ManifestStatus::Skipped, path, String::new())
            }
            TrackOutcome::Failed { error } => {
                tracing::warn!("Failed to download '{}' ({}): {}", track.title, track.id, error);
                self.failed_count += 1;
                return;
            }
        };

        self.entries.push(ManifestEntry {
            playlist_id: self.playlist_id.clone(),
            clip_id: track.id,
            title: track.title,
            file_path: path.display().to_string(),
            download_url: url,
            status,
        });
    }

    pub fn total_processed(&self) -> u64 {
        self.downloaded_count + self.skipped_count + self.failed_count
    }
}

/// Global statistics across all playlists.
#[derive(Debug, Default)]
pub struct GlobalState {
    pub downloaded_count: u64,
    pub skipped_count: u64,
    pub failed_count: u64,
    pub bytes_downloaded: u64,
    pub playlists_processed: u64,
    pub playlists_failed: u64,
}

impl GlobalState {
    /// Add statistics from a playlist's download state.
    pub fn add_playlist_stats(&mut self, state: &PlaylistState) {
        self.downloaded_count += state.downloaded_count;
        self.skipped_count += state.skipped_count;
        self.failed_count += state.failed_count;
        self.bytes_downloaded += state.bytes_downloaded;
        self.playlists_processed += 1;
    }

    /// Mark a playlist as failed.
    pub fn mark_playlist_failed(&mut self) {
        self.playlists_failed += 1;
    }
}
