//! Core data models for playlist export.
//!
//! Defines the read-only inputs the exporter consumes: [`Playlist`] and
//! [`Song`]. These are supplied by the caller (the web layer reads them
//! from its own store); the exporter never mutates or persists them.

use serde::{Deserialize, Serialize};

/// An ordered playlist built locally, to be reproduced on a platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// User-facing name, used as the remote playlist title
    pub name: String,
    /// Songs in playback order
    pub songs: Vec<Song>,
}

/// A single song entry in a playlist.
///
/// Fields are optional because entries come from heterogeneous sources:
/// a song added from Spotify search carries a `spotify_id`, while a
/// manually-entered song may only carry a title. Search-based platforms
/// need both `title` and `artists`; a song missing either is counted as
/// failed without any network call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Song {
    /// Track title
    pub title: Option<String>,
    /// Comma-joined display form of the artist names
    pub artists: Option<String>,
    /// Spotify track id, set when the song was sourced from Spotify
    pub spotify_id: Option<String>,
}

impl Playlist {
    /// Create a playlist with the given name and songs.
    pub fn new(name: impl Into<String>, songs: Vec<Song>) -> Self {
        Self {
            name: name.into(),
            songs,
        }
    }
}
