//! YouTube export strategy.
//!
//! Songs carry no YouTube id, so every track is resolved with a single
//! title+artist search against the music category, taking the first
//! hit. Adds go one video at a time (the API has no batch insert), and
//! YouTube's quota is tight enough that a short pause between
//! successive adds is needed to stay under the rate limit.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};

use super::adapter;
use crate::export::backoff::with_backoff;
use crate::export::config::ExportConfig;
use crate::export::domain::{ExportError, ExportResult, Platform, ProviderAccount, RemotePlaylist};
use crate::export::http::ApiClient;
use crate::export::traits::PlatformExporter;
use crate::model::Playlist;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// The "Music" video category
const MUSIC_CATEGORY_ID: &str = "10";

/// Exports playlists to YouTube through a connected Google account.
pub struct YoutubeExporter {
    client: Arc<ApiClient>,
    config: Arc<ExportConfig>,
    api_base: String,
}

impl YoutubeExporter {
    /// Create an exporter talking to the real YouTube Data API.
    pub fn new(client: Arc<ApiClient>, config: Arc<ExportConfig>) -> Self {
        Self {
            client,
            config,
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
        Self {
            client,
            config,
            api_base: base_url.into(),
        }
    }

    /// Create the remote playlist (private, fixed description).
    async fn create_playlist(
        &self,
        account: &ProviderAccount,
        title: &str,
    ) -> Result<RemotePlaylist, ExportError> {
        let url = format!("{}/playlists?part=snippet,status", self.api_base);
        let body = json!({
            "snippet": {
                "title": title,
                "description": self.config.playlist_description,
            },
            "status": {"privacyStatus": "private"},
        });

        let response = self
            .client
            .request(account, Method::POST, &url, Some(&body))
            .await?;
        let id = adapter::to_playlist_id(response)?;
        let url = format!("https://www.youtube.com/playlist?list={id}");

        Ok(RemotePlaylist { id, url })
    }

    /// One search against the music category; first hit wins.
    async fn search_video_id(
        &self,
        account: &ProviderAccount,
        title: &str,
        artists: &str,
    ) -> Result<Option<String>, ExportError> {
        let query = format!("{title} {artists}");
        let url = format!(
            "{}/search?part=snippet&type=video&videoCategoryId={}&maxResults=1&q={}",
            self.api_base,
            MUSIC_CATEGORY_ID,
            urlencoding::encode(&query)
        );

        let response = self.client.request(account, Method::GET, &url, None).await?;
        adapter::to_first_video_id(response)
    }

    /// Insert one video into the playlist, with retry.
    async fn add_video(
        &self,
        account: &ProviderAccount,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), ExportError> {
        let url = format!("{}/playlistItems?part=snippet", self.api_base);
        let body = json!({
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": {
                    "kind": "youtube#video",
                    "videoId": video_id,
                },
            },
        });

        with_backoff(self.config.add_attempts, self.config.add_retry_delay, || {
            self.client.request(account, Method::POST, &url, Some(&body))
        })
        .await
        .map(|_| ())
    }
}

#[async_trait]
impl PlatformExporter for YoutubeExporter {
    fn platform(&self) -> Platform {
        Platform::Google
    }

    async fn export_playlist(
        &self,
        playlist: &Playlist,
        account: &ProviderAccount,
    ) -> Result<ExportResult, ExportError> {
        if !self.is_user_connected(account).await {
            return Err(ExportError::NotConnected(Platform::Google));
        }

        let title = self.config.remote_title(&playlist.name);
        let remote = self.create_playlist(account, title).await?;
        info!(playlist_id = %remote.id, title, "created youtube playlist");

        let mut exported = 0;
        let mut failed = 0;
        let total = playlist.songs.len();

        for (index, song) in playlist.songs.iter().enumerate() {
            let is_last = index + 1 == total;

            // Search needs both fields; skip the network entirely otherwise
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

            let video_id = match self.search_video_id(account, song_title, artists).await {
                Ok(Some(id)) => id,
                Ok(None) => {
                    warn!(title = song_title, artists, "no youtube result, counting as failed");
                    failed += 1;
                    continue;
                }
                Err(err) => {
                    warn!(title = song_title, artists, error = %err, "youtube search failed, counting as failed");
                    failed += 1;
                    continue;
                }
            };

            match self.add_video(account, &remote.id, &video_id).await {
                Ok(()) => exported += 1,
                Err(err) => {
                    warn!(title = song_title, artists, video_id, error = %err, "adding video failed, counting as failed");
                    failed += 1;
                }
            }

            if (index + 1) % 10 == 0 {
                info!(done = index + 1, total, "youtube export progress");
            }

            // Stay under the rate limit between adds; pointless after
            // the last track
            if !is_last {
                tokio::time::sleep(self.config.youtube_add_throttle).await;
            }
        }

        Ok(ExportResult::new(
            Platform::Google,
            remote.id,
            remote.url,
            exported,
            failed,
        ))
    }
}
