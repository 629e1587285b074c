//! Spotify Web API Data Transfer Objects
//!
//! These types match EXACTLY what the Spotify Web API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the spotify module - convert to
//! domain types via the adapter.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api

use serde::{Deserialize, Serialize};

/// GET /v1/me - the caller's profile. Only the id is needed, to build
/// the playlist-creation URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileResponse {
    /// Spotify user id
    pub id: String,
    /// Display name (can be explicitly null)
    pub display_name: Option<String>,
}

/// POST /v1/users/{id}/playlists - the created playlist.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistResponse {
    /// Spotify playlist id
    pub id: String,
    /// Playlist name as stored remotely
    pub name: String,
    /// Shareable links keyed by service
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// The `external_urls` object attached to most Spotify resources.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExternalUrls {
    /// Link to the resource on open.spotify.com
    pub spotify: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_profile() {
        let json = r#"{
            "id": "wizzler",
            "display_name": "JM Wizzler",
            "country": "SE",
            "email": "email@example.com",
            "product": "premium"
        }"#;

        let profile: ProfileResponse = serde_json::from_str(json).expect("Should parse profile");
        assert_eq!(profile.id, "wizzler");
        assert_eq!(profile.display_name.as_deref(), Some("JM Wizzler"));
    }

    #[test]
    fn test_parse_profile_null_display_name() {
        let json = r#"{"id": "user-1", "display_name": null}"#;
        let profile: ProfileResponse = serde_json::from_str(json).expect("Should parse");
        assert!(profile.display_name.is_none());
    }

    #[test]
    fn test_parse_created_playlist() {
        let json = r#"{
            "id": "7d2D2S200NyUE5KYs80PwO",
            "name": "Road Trip",
            "public": false,
            "collaborative": false,
            "description": "Created with Playlist Porter",
            "external_urls": {
                "spotify": "https://open.spotify.com/playlist/7d2D2S200NyUE5KYs80PwO"
            },
            "snapshot_id": "MSw4NDE1NzM1ZDg0"
        }"#;

        let playlist: PlaylistResponse = serde_json::from_str(json).expect("Should parse playlist");
        assert_eq!(playlist.id, "7d2D2S200NyUE5KYs80PwO");
        assert_eq!(playlist.name, "Road Trip");
        assert_eq!(
            playlist.external_urls.spotify.as_deref(),
            Some("https://open.spotify.com/playlist/7d2D2S200NyUE5KYs80PwO")
        );
    }

    #[test]
    fn test_parse_playlist_without_external_urls() {
        let json = r#"{"id": "abc", "name": "Minimal"}"#;
        let playlist: PlaylistResponse = serde_json::from_str(json).expect("Should parse");
        assert!(playlist.external_urls.spotify.is_none());
    }
}
