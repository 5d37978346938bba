//! API response type definitions.

use serde::Deserialize;
use serde_json::Value;

/// Playlist response from `/api/playlist/{id}`.
///
/// Entries are kept as raw JSON so that one odd entry does not make the whole
/// playlist unreadable; they are interpreted by the track resolver.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistResponse {
    pub id: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub playlist_clips: Option<Vec<Value>>,
    pub clips: Option<Vec<Value>>,
    pub items: Option<Vec<Value>>,
}

impl PlaylistResponse {
    /// The first non-empty title field.
    pub fn display_title(&self) -> Option<&str> {
        [self.title.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// Playlist entries from whichever list key the response uses.
    pub fn entries(&self) -> &[Value] {
        [&self.playlist_clips, &self.clips, &self.items]
            .into_iter()
            .flatten()
            .find(|entries| !entries.is_empty())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A playlist entry in any of the shapes the API returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClipEntry {
    /// `{"clip": {...}, "relative_index": 0}`
    Wrapped { clip: ClipRef },
    /// The clip object itself.
    Clip(ClipInfo),
    /// A bare clip ID.
    Id(String),
}

/// The `clip` value inside a wrapped entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClipRef {
    Clip(ClipInfo),
    Id(String),
}

/// Clip (track) metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ClipInfo {
    pub id: String,
    pub title: Option<String>,
    pub audio_url: Option<String>,
}

/// Response from the billing download endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadUrlResponse {
    pub download_url: Option<String>,
    pub url: Option<String>,
}

impl DownloadUrlResponse {
    pub fn into_url(self) -> Option<String> {
        self.download_url
            .into_iter()
            .chain(self.url)
            .find(|u| !u.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_key_precedence() {
        let response: PlaylistResponse = serde_json::from_str(
            r#"{"name": "Mix", "clips": [], "items": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(response.display_title(), Some("Mix"));
        assert_eq!(response.entries().len(), 2);
    }

    #[test]
    fn test_blank_title_falls_through() {
        let response: PlaylistResponse =
            serde_json::from_str(r#"{"title": "  ", "name": "Named"}"#).unwrap();
        assert_eq!(response.display_title(), Some("Named"));

        let response: PlaylistResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.display_title(), None);
        assert!(response.entries().is_empty());
    }

    #[test]
    fn test_download_url_keys() {
        let r: DownloadUrlResponse =
            serde_json::from_str(r#"{"download_url": "https://cdn/a.mp3"}"#).unwrap();
        assert_eq!(r.into_url().as_deref(), Some("https://cdn/a.mp3"));

        let r: DownloadUrlResponse =
            serde_json::from_str(r#"{"download_url": "", "url": "https://cdn/b.wav"}"#).unwrap();
        assert_eq!(r.into_url().as_deref(), Some("https://cdn/b.wav"));

        let r: DownloadUrlResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert_eq!(r.into_url(), None);
    }
}
