//! Playlist download logic.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use futures::{stream, StreamExt, TryStreamExt};
use indicatif::{MultiProgress, ProgressBar};
use tokio::time::sleep;

use crate::api::SunoApi;
use crate::config::Config;
use crate::download::retry::{download_with_retry, RetryPolicy};
use crate::download::state::{PlaylistState, TrackOutcome, TrackReport};
use crate::download::track::{download_track, TrackJob};
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, find_existing_track, get_playlist_folder};
use crate::manifest::write_manifests;
use crate::output::{create_item_bar, create_spinner};
use crate::track::{resolve_playlist, Track};

/// A track after URL resolution.
enum Step {
    /// Nothing left to fetch.
    Done(TrackReport),
    Fetch(TrackJob),
}

/// Download every track of one playlist into its own folder.
///
/// Tracks whose file already exists are skipped without touching the network,
/// as are repeats of a track listed earlier in the same playlist.
/// Download URLs are requested one at a time, pausing between requests, and
/// each resolved track is fetched as soon as a worker is free, so at most
/// `download_workers` files are in flight. An authentication failure aborts
/// the playlist; any other per-track failure is counted and the rest continue.
pub async fn download_playlist(
    api: &SunoApi,
    config: &Config,
    playlist_id: &str,
    progress: &MultiProgress,
) -> Result<PlaylistState> {
    let spinner = progress.add(create_spinner(&format!("Fetching playlist {}...", playlist_id)));
    let response = api.get_playlist(playlist_id).await;
    spinner.finish_and_clear();
    progress.remove(&spinner);

    let playlist = resolve_playlist(playlist_id, &response?);
    let folder = get_playlist_folder(config, &playlist);
    ensure_dir(&folder).await?;

    tracing::info!(
        "Playlist '{}': {} tracks -> {}",
        playlist.title,
        playlist.len(),
        folder.display()
    );

    let mut state = PlaylistState::new(playlist.id.clone(), playlist.title.clone(), folder.clone());
    state.track_count = playlist.len() as u64;

    let bar = progress.add(create_item_bar(playlist.len() as u64, "Tracks"));

    let mut reports = Vec::new();
    let mut pending = Vec::new();
    let mut duplicates = Vec::new();
    let mut planned = HashSet::new();
    for (index, track) in playlist.tracks.into_iter().enumerate() {
        let stem = track.file_stem();

        // A clip listed twice is fetched once and resolved after the downloads
        if planned.contains(&stem) {
            tracing::debug!("'{}' ({}) is listed more than once", track.title, track.id);
            duplicates.push((index, track));
            continue;
        }

        match find_existing_track(&folder, &stem).await? {
            Some(path) => {
                tracing::info!("Skipping existing file: {}", path.display());
                bar.inc(1);
                reports.push(TrackReport {
                    index,
                    track,
                    outcome: TrackOutcome::Skipped { path },
                });
            }
            None => {
                planned.insert(stem);
                pending.push((index, track));
            }
        }
    }

    let policy = RetryPolicy::from_config(config);
    let delay = config.download_delay();
    let workers = config.download_workers.max(1);
    let dir: &Path = &folder;
    let policy_ref = &policy;
    let bar_ref = &bar;

    let fetched = stream::iter(pending.into_iter().enumerate())
        .then(move |(n, (index, track))| {
            let pause = if n > 0 { delay } else { Duration::ZERO };
            resolve_step(api, dir, pause, index, track)
        })
        .map_ok(move |step| run_step(api, policy_ref, progress, bar_ref, step))
        .try_buffer_unordered(workers)
        .try_collect::<Vec<TrackReport>>()
        .await;

    bar.finish_and_clear();
    progress.remove(&bar);

    reports.extend(fetched?);

    for (index, track) in duplicates {
        let outcome = match find_existing_track(&folder, &track.file_stem()).await? {
            Some(path) => TrackOutcome::Skipped { path },
            None => TrackOutcome::Failed {
                error: "Earlier copy in the playlist failed to download".to_string(),
            },
        };
        reports.push(TrackReport {
            index,
            track,
            outcome,
        });
    }

    state.record_all(reports);

    write_manifests(config, &folder, &state.entries)?;

    tracing::info!(
        "Playlist '{}' complete: {} downloaded, {} skipped, {} failed",
        state.title,
        state.downloaded_count,
        state.skipped_count,
        state.failed_count
    );

    Ok(state)
}

/// Work out where a track will be fetched from.
async fn resolve_step(
    api: &SunoApi,
    dir: &Path,
    pause: Duration,
    index: usize,
    track: Track,
) -> Result<Step> {
    if !pause.is_zero() {
        sleep(pause).await;
    }

    match resolve_media_url(api, &track).await? {
        Some(url) => Ok(Step::Fetch(TrackJob {
            index,
            track,
            url,
            dir: dir.to_path_buf(),
        })),
        None => {
            let error = Error::NoDownloadUrl(track.id.clone()).to_string();
            Ok(Step::Done(TrackReport {
                index,
                track,
                outcome: TrackOutcome::Failed { error },
            }))
        }
    }
}

/// Prefer a signed download URL, falling back to the clip's public audio URL.
async fn resolve_media_url(api: &SunoApi, track: &Track) -> Result<Option<String>> {
    match api.request_download_url(&track.id).await {
        Ok(Some(url)) => return Ok(Some(url)),
        Ok(None) => {
            tracing::warn!("No signed download URL for '{}' ({})", track.title, track.id);
        }
        Err(Error::Authentication(msg)) => return Err(Error::Authentication(msg)),
        Err(e) => {
            tracing::warn!(
                "Failed to get download URL for '{}' ({}): {}",
                track.title,
                track.id,
                e
            );
        }
    }

    if track.media_url.is_some() {
        tracing::debug!("Using audio_url for '{}'", track.title);
    }
    Ok(track.media_url.clone())
}

async fn run_step(
    api: &SunoApi,
    policy: &RetryPolicy,
    progress: &MultiProgress,
    bar: &ProgressBar,
    step: Step,
) -> Result<TrackReport> {
    let report = match step {
        Step::Done(report) => report,
        Step::Fetch(job) => {
            let result = download_with_retry(policy, || download_track(api, &job, progress)).await;
            let outcome = match result {
                Ok(file) => TrackOutcome::Downloaded {
                    path: file.path,
                    url: job.url.clone(),
                    bytes: file.bytes,
                },
                Err(e) => TrackOutcome::Failed {
                    error: e.to_string(),
                },
            };
            TrackReport {
                index: job.index,
                track: job.track,
                outcome,
            }
        }
    };

    bar.inc(1);
    Ok(report)
}
