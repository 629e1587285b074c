//! Spotify integration
//!
//! Exports playlists through the Spotify Web API. Songs sourced from
//! Spotify carry their track id, so no search step is involved.
//!
//! API docs: https://developer.spotify.com/documentation/web-api

pub mod dto;
mod adapter;
mod exporter;

pub use exporter::SpotifyExporter;
