//! Adapter layer: Convert SoundCloud DTOs to domain models
//!
//! The ONLY place where SoundCloud DTO types are converted to domain
//! types. Numeric ids become opaque strings here and nowhere else.

use serde_json::Value;

use super::dto;
use crate::export::domain::{ExportError, RemotePlaylist};

/// A search-result track reduced to what the matcher scores.
#[derive(Debug, Clone)]
pub struct TrackCandidate {
    pub id: u64,
    pub title: String,
    /// Uploader username; SoundCloud's nearest notion of "artist"
    pub artist: String,
}

/// Convert a search response into scoring candidates.
///
/// The search endpoint returns a bare array; with pagination enabled it
/// wraps the same objects in `{"collection": [...]}`. Both shapes are
/// accepted.
pub fn to_candidates(body: Value) -> Result<Vec<TrackCandidate>, ExportError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("collection") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ExportError::InvalidResponse(
                    "soundcloud search: expected array or collection".to_string(),
                ));
            }
        },
        other => {
            return Err(ExportError::InvalidResponse(format!(
                "soundcloud search: unexpected {other}"
            )));
        }
    };

    let mut candidates = Vec::with_capacity(items.len());
    for item in items {
        let track: dto::TrackResponse = serde_json::from_value(item)
            .map_err(|e| ExportError::InvalidResponse(format!("soundcloud track: {e}")))?;
        candidates.push(TrackCandidate {
            id: track.id,
            title: track.title,
            artist: track.user.map(|u| u.username).unwrap_or_default(),
        });
    }
    Ok(candidates)
}

/// Convert a playlist-creation response into a [`RemotePlaylist`].
pub fn to_remote_playlist(body: Value) -> Result<RemotePlaylist, ExportError> {
    let playlist: dto::PlaylistResponse = serde_json::from_value(body)
        .map_err(|e| ExportError::InvalidResponse(format!("soundcloud playlist: {e}")))?;

    let id = playlist.id.to_string();
    let url = playlist
        .permalink_url
        .unwrap_or_else(|| format!("https://soundcloud.com/playlists/{id}"));

    Ok(RemotePlaylist { id, url })
}

/// The current track ids of a fetched playlist, in order.
pub fn to_track_ids(body: Value) -> Result<Vec<u64>, ExportError> {
    let playlist: dto::PlaylistResponse = serde_json::from_value(body)
        .map_err(|e| ExportError::InvalidResponse(format!("soundcloud playlist: {e}")))?;
    Ok(playlist.tracks.into_iter().map(|t| t.id).collect())
}
