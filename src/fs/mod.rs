//! Filesystem module.
//!
//! Provides:
//! - Path and directory management
//! - Filename sanitizing and naming

pub mod naming;
pub mod paths;

pub use naming::{is_part_file, part_path, sanitize_filename, track_filename};
pub use paths::{ensure_dir, find_existing_track, get_playlist_folder};
