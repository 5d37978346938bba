//! Filename generation and manipulation.

use std::path::{Path, PathBuf};

/// Name used when sanitizing leaves nothing.
pub const FALLBACK_NAME: &str = "unnamed";

/// Suffix of in-progress downloads.
pub const PART_EXTENSION: &str = "part";

/// Make a string safe to use as a single path component.
///
/// Separators, reserved characters, and control characters become `_`, and
/// surrounding whitespace is trimmed. A name made only of dots is replaced so
/// it can never refer to the current or parent directory.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim();

    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return FALLBACK_NAME.to_string();
    }

    trimmed.to_string()
}

/// File name for a track: `<stem>.<extension>`.
pub fn track_filename(stem: &str, extension: &str) -> String {
    format!("{}.{}", stem, extension)
}

/// Temporary path a download is streamed to before being moved into place.
pub fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(PART_EXTENSION);
    PathBuf::from(name)
}

/// Whether a path is an unfinished download.
pub fn is_part_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(PART_EXTENSION)
}
