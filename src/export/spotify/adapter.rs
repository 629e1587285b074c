//! Adapter layer: Convert Spotify DTOs to domain models
//!
//! This is the ONLY place where Spotify DTO types are converted to
//! domain types, so an API change touches this file and dto.rs only.

use serde_json::Value;

use super::dto;
use crate::export::domain::{ExportError, RemotePlaylist};

/// Extract the caller's user id from a profile response body.
pub fn to_user_id(body: Value) -> Result<String, ExportError> {
    let profile: dto::ProfileResponse = serde_json::from_value(body)
        .map_err(|e| ExportError::InvalidResponse(format!("spotify profile: {e}")))?;
    Ok(profile.id)
}

/// Convert a playlist-creation response into a [`RemotePlaylist`].
///
/// The shareable URL comes from `external_urls.spotify` when present;
/// otherwise it is rebuilt from the id, which is always valid for
/// public playlist links.
pub fn to_remote_playlist(body: Value) -> Result<RemotePlaylist, ExportError> {
    let playlist: dto::PlaylistResponse = serde_json::from_value(body)
        .map_err(|e| ExportError::InvalidResponse(format!("spotify playlist: {e}")))?;

    let url = playlist
        .external_urls
        .spotify
        .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", playlist.id));

    Ok(RemotePlaylist {
        id: playlist.id,
        url,
    })
}
