//! Track module for playlist resolution.

pub mod item;
pub mod resolver;

pub use item::{Playlist, Track};
pub use resolver::{choose_extension, resolve_playlist, DEFAULT_EXTENSION};
