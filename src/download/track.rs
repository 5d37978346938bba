//! Single track downloading.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use indicatif::MultiProgress;
use reqwest::header;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::SunoApi;
use crate::error::{Error, Result};
use crate::fs::{part_path, track_filename};
use crate::output::create_download_bar;
use crate::track::{choose_extension, Track};

/// A track with a resolved media URL, ready to fetch.
#[derive(Debug, Clone)]
pub struct TrackJob {
    pub index: usize,
    pub track: Track,
    pub url: String,
    pub dir: PathBuf,
}

/// A finished download.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Download one track into its playlist folder.
///
/// The body is streamed to a `.part` file which is renamed once complete.
pub async fn download_track(
    api: &SunoApi,
    job: &TrackJob,
    progress: &MultiProgress,
) -> Result<DownloadedFile> {
    let response = api.download_file(&job.url).await?;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let extension = choose_extension(&job.url, content_type.as_deref());
    let output_path = job
        .dir
        .join(track_filename(&job.track.file_stem(), &extension));
    let temp_path = part_path(&output_path);

    let bar = progress.add(create_download_bar(
        response.content_length(),
        &job.track.title,
    ));

    let result = stream_to_file(response, &temp_path, |n| bar.inc(n)).await;
    bar.finish_and_clear();
    progress.remove(&bar);

    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }
    };

    tokio::fs::rename(&temp_path, &output_path).await?;
    tracing::info!("Downloaded: {}", output_path.display());

    Ok(DownloadedFile {
        path: output_path,
        bytes,
    })
}

/// Stream a response body to `path`, reporting chunk sizes to `on_chunk`.
async fn stream_to_file<F>(response: reqwest::Response, path: &Path, mut on_chunk: F) -> Result<u64>
where
    F: FnMut(u64),
{
    let expected = response.content_length();
    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        on_chunk(chunk.len() as u64);
    }

    file.flush().await?;

    if let Some(expected) = expected {
        if downloaded < expected {
            return Err(Error::Download(format!(
                "Connection closed after {} of {} bytes",
                downloaded, expected
            )));
        }
    }

    Ok(downloaded)
}
