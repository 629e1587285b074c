//! Adapter layer: Convert YouTube DTOs to domain models
//!
//! The ONLY place where YouTube DTO types are converted to domain
//! types, so an API change touches this file and dto.rs only.

use serde_json::Value;

use super::dto;
use crate::export::domain::ExportError;

/// The first search hit's video id, if the search returned anything.
pub fn to_first_video_id(body: Value) -> Result<Option<String>, ExportError> {
    let response: dto::SearchResponse = serde_json::from_value(body)
        .map_err(|e| ExportError::InvalidResponse(format!("youtube search: {e}")))?;

    Ok(response
        .items
        .into_iter()
        .next()
        .and_then(|item| item.id.video_id))
}

/// The created playlist's id.
pub fn to_playlist_id(body: Value) -> Result<String, ExportError> {
    let playlist: dto::PlaylistResponse = serde_json::from_value(body)
        .map_err(|e| ExportError::InvalidResponse(format!("youtube playlist: {e}")))?;
    Ok(playlist.id)
}
