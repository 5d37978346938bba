//! Per-playlist download manifests.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;

pub const MANIFEST_JSON: &str = "manifest.json";
pub const MANIFEST_CSV: &str = "manifest.csv";

/// Whether a manifest row was fetched in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestStatus {
    Downloaded,
    Skipped,
}

/// One row of a playlist manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub playlist_id: String,
    pub clip_id: String,
    pub title: String,
    pub file_path: String,
    /// Empty for skipped tracks.
    pub download_url: String,
    pub status: ManifestStatus,
}

/// Write `manifest.json` as a pretty-printed array.
pub fn write_json(dir: &Path, entries: &[ManifestEntry]) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_JSON);
    let content = serde_json::to_string_pretty(entries)?;
    fs::write(&path, content)?;
    Ok(path)
}

/// Write `manifest.csv` with a header row.
pub fn write_csv(dir: &Path, entries: &[ManifestEntry]) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_CSV);
    let mut writer = csv::Writer::from_path(&path)?;
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(path)
}

/// Write whichever manifests the config enables.
///
/// The CSV is only written when there is at least one row.
pub fn write_manifests(config: &Config, dir: &Path, entries: &[ManifestEntry]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if config.manifest_json {
        written.push(write_json(dir, entries)?);
    }

    if config.manifest_csv && !entries.is_empty() {
        written.push(write_csv(dir, entries)?);
    }

    for path in &written {
        tracing::debug!("Wrote manifest {}", path.display());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(clip_id: &str, title: &str) -> ManifestEntry {
        ManifestEntry {
            playlist_id: "p1".to_string(),
            clip_id: clip_id.to_string(),
            title: title.to_string(),
            file_path: format!("/out/{}_{}.mp3", title, clip_id),
            download_url: format!("https://cdn/{}.mp3", clip_id),
            status: ManifestStatus::Downloaded,
        }
    }

    #[test]
    fn test_json_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![entry("c1", "Intro"), entry("c2", "Outro")];

        let path = write_json(dir.path(), &entries).unwrap();
        let parsed: Vec<ManifestEntry> =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_csv_manifest_quotes_commas() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![entry("c1", "Hello, World")];

        let path = write_csv(dir.path(), &entries).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let mut lines = content.lines();

        assert_eq!(
            lines.next(),
            Some("playlist_id,clip_id,title,file_path,download_url,status")
        );
        assert!(lines.next().unwrap().contains("\"Hello, World\""));
    }

    #[test]
    fn test_write_manifests_respects_flags() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();

        let written = write_manifests(&config, dir.path(), &[]).unwrap();
        assert_eq!(written, vec![dir.path().join(MANIFEST_JSON)]);
        assert_eq!(fs::read_to_string(dir.path().join(MANIFEST_JSON)).unwrap(), "[]");

        config.manifest_json = false;
        let written = write_manifests(&config, dir.path(), &[entry("c1", "Intro")]).unwrap();
        assert_eq!(written, vec![dir.path().join(MANIFEST_CSV)]);
    }
}
