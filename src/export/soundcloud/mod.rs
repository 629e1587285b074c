//! SoundCloud integration
//!
//! Exports playlists through the SoundCloud API v1, using the legacy
//! `OAuth` authorization scheme. Track resolution goes through a fuzzy
//! matcher because SoundCloud carries no cross-catalog track ids.
//!
//! API docs: https://developers.soundcloud.com/docs/api

pub mod dto;
pub mod matcher;
mod adapter;
mod exporter;

pub use exporter::SoundcloudExporter;
pub use matcher::TrackMatcher;
