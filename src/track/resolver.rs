//! Playlist resolution and file-extension helpers.

use serde_json::Value;

use crate::api::types::{ClipEntry, ClipInfo, ClipRef, PlaylistResponse};
use crate::track::item::{Playlist, Track};

/// Extension used when neither URL nor content type gives one.
pub const DEFAULT_EXTENSION: &str = "wav";

/// Turn a playlist response into an ordered track list.
///
/// `playlist_id` is the ID that was requested; entries without a clip ID are
/// skipped.
pub fn resolve_playlist(playlist_id: &str, response: &PlaylistResponse) -> Playlist {
    let title = response
        .display_title()
        .unwrap_or(playlist_id)
        .to_string();

    let tracks = response
        .entries()
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let track = parse_entry(entry);
            if track.is_none() {
                tracing::warn!("Skipping playlist entry {} without a clip ID", index);
            }
            track
        })
        .collect();

    Playlist {
        id: playlist_id.to_string(),
        title,
        tracks,
    }
}

fn parse_entry(entry: &Value) -> Option<Track> {
    let entry: ClipEntry = serde_json::from_value(entry.clone()).ok()?;

    let track = match entry {
        ClipEntry::Wrapped {
            clip: ClipRef::Clip(info),
        }
        | ClipEntry::Clip(info) => track_from_info(info),
        ClipEntry::Wrapped {
            clip: ClipRef::Id(id),
        }
        | ClipEntry::Id(id) => Track {
            title: id.clone(),
            id,
            media_url: None,
        },
    };

    if track.id.trim().is_empty() {
        return None;
    }
    Some(track)
}

fn track_from_info(info: ClipInfo) -> Track {
    let title = info
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| info.id.clone());

    Track {
        id: info.id,
        title,
        media_url: info.audio_url.filter(|u| !u.trim().is_empty()),
    }
}

/// Pick a file extension for a download.
///
/// Prefers the URL path, then the response content type, then
/// [`DEFAULT_EXTENSION`].
pub fn choose_extension(url: &str, content_type: Option<&str>) -> String {
    extract_extension_from_url(url)
        .or_else(|| content_type.and_then(extension_for_mime))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Extract extension from URL path.
pub fn extract_extension_from_url(url: &str) -> Option<String> {
    // Remove query string and fragment
    let path = url.split(['?', '#']).next()?;

    // Get the last segment
    let filename = path.rsplit('/').next()?;

    // Get extension
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }

    // Validate it looks like an extension (1-10 chars, alphanumeric)
    if !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext.to_lowercase())
    } else {
        None
    }
}

/// Convert a MIME type to a file extension.
pub fn extension_for_mime(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim().to_lowercase();

    // Preferred spellings for the audio types the CDN serves
    let preferred = match essence.as_str() {
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/wav" | "audio/x-wav" | "audio/wave" => Some("wav"),
        "audio/mp4" | "audio/x-m4a" => Some("m4a"),
        "video/mp4" => Some("mp4"),
        "application/octet-stream" | "binary/octet-stream" => return None,
        _ => None,
    };

    if let Some(ext) = preferred {
        return Some(ext.to_string());
    }

    mime_guess::get_mime_extensions_str(&essence)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
}
