//! SoundCloud export strategy.
//!
//! Tracks are resolved through the fuzzy [`TrackMatcher`] - SoundCloud
//! carries no cross-catalog ids and its uploads are user-generated.
//! Adding a track is a read-modify-write: the API has no atomic append,
//! so the current track list is fetched, the new id appended, and the
//! whole list PUT back. That pattern is also why exports run strictly
//! sequentially - concurrent writers to the same playlist would lose
//! updates.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};

use super::adapter;
use super::matcher::TrackMatcher;
use crate::export::backoff::with_backoff;
use crate::export::config::ExportConfig;
use crate::export::domain::{ExportError, ExportResult, Platform, ProviderAccount, RemotePlaylist};
use crate::export::http::ApiClient;
use crate::export::traits::PlatformExporter;
use crate::model::Playlist;

const API_BASE: &str = "https://api.soundcloud.com";

/// Exports playlists to SoundCloud.
pub struct SoundcloudExporter {
    client: Arc<ApiClient>,
    config: Arc<ExportConfig>,
    matcher: TrackMatcher,
    api_base: String,
}

impl SoundcloudExporter {
    /// Create an exporter talking to the real SoundCloud API.
    pub fn new(client: Arc<ApiClient>, config: Arc<ExportConfig>) -> Self {
        let matcher = TrackMatcher::new(client.clone(), &config, API_BASE);
        Self {
            client,
            config,
            matcher,
            api_base: API_BASE.to_string(),
        }
    }

    /// Create an exporter for testing with a custom base URL.
    #[cfg(test)]
    pub fn with_base_url(
        client: Arc<ApiClient>,
        config: Arc<ExportConfig>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        let matcher = TrackMatcher::new(client.clone(), &config, base_url.clone());
        Self {
            client,
            config,
            matcher,
            api_base: base_url,
        }
    }

    /// Create the remote playlist (private, fixed description).
    async fn create_playlist(
        &self,
        account: &ProviderAccount,
        title: &str,
    ) -> Result<RemotePlaylist, ExportError> {
        let url = format!("{}/playlists", self.api_base);
        let body = json!({
            "playlist": {
                "title": title,
                "sharing": "private",
                "description": self.config.playlist_description,
            },
        });

        let response = self
            .client
            .request(account, Method::POST, &url, Some(&body))
            .await?;
        adapter::to_remote_playlist(response)
    }

    /// Append one track: fetch the current list, push the id, PUT the
    /// whole list back. Retried as a unit.
    async fn add_track(
        &self,
        account: &ProviderAccount,
        playlist_id: &str,
        track_id: u64,
    ) -> Result<(), ExportError> {
        let url = format!("{}/playlists/{}", self.api_base, playlist_id);

        with_backoff(self.config.add_attempts, self.config.add_retry_delay, || async {
            let current = self.client.request(account, Method::GET, &url, None).await?;
            let mut track_ids = adapter::to_track_ids(current)?;
            track_ids.push(track_id);

            let tracks: Vec<_> = track_ids.iter().map(|id| json!({"id": id})).collect();
            let body = json!({"playlist": {"tracks": tracks}});
            self.client
                .request(account, Method::PUT, &url, Some(&body))
                .await?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl PlatformExporter for SoundcloudExporter {
    fn platform(&self) -> Platform {
        Platform::Soundcloud
    }

    async fn export_playlist(
        &self,
        playlist: &Playlist,
        account: &ProviderAccount,
    ) -> Result<ExportResult, ExportError> {
        if !self.is_user_connected(account).await {
            return Err(ExportError::NotConnected(Platform::Soundcloud));
        }

        let title = self.config.remote_title(&playlist.name);
        let remote = self.create_playlist(account, title).await?;
        info!(playlist_id = %remote.id, title, "created soundcloud playlist");

        let mut exported = 0;
        let mut failed = 0;
        let total = playlist.songs.len();

        for (index, song) in playlist.songs.iter().enumerate() {
            let (Some(song_title), Some(artists)) = (song.title.as_deref(), song.artists.as_deref())
            else {
                warn!(
                    title = song.title.as_deref().unwrap_or(""),
                    artists = song.artists.as_deref().unwrap_or(""),
                    "song is missing title or artists, counting as failed"
                );
                failed += 1;
                continue;
            };

            let Some(track_id) = self.matcher.best_match(account, song_title, artists).await
            else {
                warn!(title = song_title, artists, "no soundcloud match, counting as failed");
                failed += 1;
                continue;
            };

            match self.add_track(account, &remote.id, track_id).await {
                Ok(()) => exported += 1,
                Err(err) => {
                    warn!(title = song_title, artists, track_id, error = %err, "adding track failed, counting as failed");
                    failed += 1;
                }
            }

            if (index + 1) % 10 == 0 {
                info!(done = index + 1, total, "soundcloud export progress");
            }
        }

        Ok(ExportResult::new(
            Platform::Soundcloud,
            remote.id,
            remote.url,
            exported,
            failed,
        ))
    }
}
