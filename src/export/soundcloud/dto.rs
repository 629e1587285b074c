//! SoundCloud API v1 Data Transfer Objects
//!
//! These types match EXACTLY what the SoundCloud API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the soundcloud module - convert to
//! domain types via the adapter.
//!
//! API Reference: https://developers.soundcloud.com/docs/api
//!
//! SoundCloud ids are numeric on the wire; they stay numeric inside
//! this module and become opaque strings at the domain boundary.

use serde::{Deserialize, Serialize};

/// A track, as returned by search and inside playlist bodies.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackResponse {
    pub id: u64,
    pub title: String,
    /// The uploading user; their username stands in for the artist
    pub user: Option<UserResponse>,
    pub permalink_url: Option<String>,
}

/// The uploader attached to a track.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserResponse {
    pub username: String,
}

/// A playlist, as returned by create/fetch/update.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistResponse {
    pub id: u64,
    pub title: Option<String>,
    pub permalink_url: Option<String>,
    /// Full track list; SoundCloud has no append endpoint, updates
    /// replace this list wholesale
    #[serde(default)]
    pub tracks: Vec<TrackRef>,
}

/// A track reference inside a playlist body. Only the id matters for
/// the read-modify-write update.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackRef {
    pub id: u64,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
