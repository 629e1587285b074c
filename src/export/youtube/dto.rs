//! YouTube Data API v3 Data Transfer Objects
//!
//! These types match EXACTLY what the YouTube Data API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the youtube module - convert to
//! domain types via the adapter.
//!
//! API Reference: https://developers.google.com/youtube/v3/docs

use serde::{Deserialize, Serialize};

/// GET /search - result page. Only the first item is used.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// One search result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchItem {
    pub id: SearchItemId,
}

/// The id object of a search result. `videoId` is only present when
/// the result is a video (we request `type=video`, but stay defensive
/// about the shape).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub kind: Option<String>,
    pub video_id: Option<String>,
}

/// POST /playlists - the created playlist.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistResponse {
    /// YouTube playlist id
    pub id: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
