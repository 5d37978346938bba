//! Playlist and track representation.

/// A downloadable track (a "clip" in API terms).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Clip ID.
    pub id: String,

    /// Display title, falling back to the ID.
    pub title: String,

    /// Streaming URL listed in the playlist, used when no signed URL is given.
    pub media_url: Option<String>,
}

impl Track {
    /// File stem used on disk: `<title>_<id>`.
    pub fn file_stem(&self) -> String {
        join_name(&self.title, &self.id)
    }
}

fn join_name(title: &str, id: &str) -> String {
    format!(
        "{}_{}",
        crate::fs::sanitize_filename(title),
        crate::fs::sanitize_filename(id)
    )
}

/// A playlist resolved into its ordered tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Folder name under the output root: `<title>_<id>`.
    pub fn folder_name(&self) -> String {
        join_name(&self.title, &self.id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_sanitized() {
        let track = Track {
            id: "c1".to_string(),
            title: "AC/DC: Live?".to_string(),
            media_url: None,
        };
        assert_eq!(track.file_stem(), "AC_DC_ Live__c1");

        let playlist = Playlist {
            id: "p1".to_string(),
            title: "Road <Trip>".to_string(),
            tracks: vec![track],
        };
        assert_eq!(playlist.folder_name(), "Road _Trip__p1");
        assert_eq!(playlist.len(), 1);
    }
}
