//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::fs::naming::is_part_file;
use crate::track::Playlist;

/// Folder a playlist's files are written to.
pub fn get_playlist_folder(config: &Config, playlist: &Playlist) -> PathBuf {
    config.output_root.join(playlist.folder_name())
}

/// Find a finished download for `stem` in `dir`, whatever its extension.
pub async fn find_existing_track(dir: &Path, stem: &str) -> Result<Option<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        if !entry.file_type().await?.is_file() || is_part_file(&path) {
            continue;
        }

        if path.file_stem().and_then(|s| s.to_str()) == Some(stem) {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    #[test]
    fn test_get_playlist_folder() {
        let config = Config {
            output_root: PathBuf::from("/downloads"),
            ..Config::default()
        };
        let playlist = Playlist {
            id: "p1".to_string(),
            title: "Lo/Fi".to_string(),
            tracks: Vec::<Track>::new(),
        };

        assert_eq!(
            get_playlist_folder(&config, &playlist),
            PathBuf::from("/downloads/Lo_Fi_p1")
        );
    }

    #[tokio::test]
    async fn test_find_existing_track() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Song_c1.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("Other_c2.wav.part"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("Folder_c3")).unwrap();

        assert_eq!(
            find_existing_track(dir.path(), "Song_c1").await.unwrap(),
            Some(dir.path().join("Song_c1.mp3"))
        );
        assert_eq!(find_existing_track(dir.path(), "Other_c2").await.unwrap(), None);
        assert_eq!(find_existing_track(dir.path(), "Folder_c3").await.unwrap(), None);
        assert_eq!(
            find_existing_track(&dir.path().join("missing"), "Song_c1")
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_ensure_dir_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
