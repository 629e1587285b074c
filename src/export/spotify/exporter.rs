//! Spotify export strategy.
//!
//! Spotify is the source catalog for most locally-built playlists, so
//! songs usually carry a native track id and no search is needed: the
//! id maps straight to a `spotify:track:` URI. Adds are batched - the
//! playlist-tracks endpoint accepts up to 100 URIs per call.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, warn};

use super::adapter;
use crate::export::backoff::with_backoff;
use crate::export::config::ExportConfig;
use crate::export::domain::{ExportError, ExportResult, Platform, ProviderAccount, RemotePlaylist};
use crate::export::http::ApiClient;
use crate::export::traits::PlatformExporter;
use crate::model::Playlist;

const API_BASE: &str = "https://api.spotify.com";

/// Maximum URIs per add call, set by the Spotify API
const ADD_BATCH_SIZE: usize = 100;

/// Exports playlists to Spotify.
pub struct SpotifyExporter {
    client: Arc<ApiClient>,
    config: Arc<ExportConfig>,
    api_base: String,
}

impl SpotifyExporter {
    /// Create an exporter talking to the real Spotify Web API.
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

    /// The caller's own user id, needed for the playlist-creation URL.
    async fn fetch_user_id(&self, account: &ProviderAccount) -> Result<String, ExportError> {
        let body = self
            .client
            .request(account, Method::GET, &format!("{}/v1/me", self.api_base), None)
            .await?;
        adapter::to_user_id(body)
    }

    /// Create the remote playlist (private, fixed description).
    async fn create_playlist(
        &self,
        account: &ProviderAccount,
        user_id: &str,
        title: &str,
    ) -> Result<RemotePlaylist, ExportError> {
        let url = format!("{}/v1/users/{}/playlists", self.api_base, user_id);
        let body = json!({
            "name": title,
            "public": false,
            "description": self.config.playlist_description,
        });

        let response = self
            .client
            .request(account, Method::POST, &url, Some(&body))
            .await?;
        adapter::to_remote_playlist(response)
    }
}

#[async_trait]
impl PlatformExporter for SpotifyExporter {
    fn platform(&self) -> Platform {
        Platform::Spotify
    }

    async fn export_playlist(
        &self,
        playlist: &Playlist,
        account: &ProviderAccount,
    ) -> Result<ExportResult, ExportError> {
        if !self.is_user_connected(account).await {
            return Err(ExportError::NotConnected(Platform::Spotify));
        }

        let user_id = self.fetch_user_id(account).await?;
        let title = self.config.remote_title(&playlist.name);
        let remote = self.create_playlist(account, &user_id, title).await?;
        info!(playlist_id = %remote.id, title, "created spotify playlist");

        // Songs without a native id cannot be added - Spotify never
        // falls back to search, the source catalog is Spotify itself
        let mut failed = 0;
        let mut uris = Vec::with_capacity(playlist.songs.len());
        for song in &playlist.songs {
            match song.spotify_id.as_deref() {
                Some(id) => uris.push(format!("spotify:track:{id}")),
                None => {
                    warn!(
                        title = song.title.as_deref().unwrap_or(""),
                        artists = song.artists.as_deref().unwrap_or(""),
                        "song has no spotify id, counting as failed"
                    );
                    failed += 1;
                }
            }
        }

        let add_url = format!("{}/v1/playlists/{}/tracks", self.api_base, remote.id);
        let mut exported = 0;
        for batch in uris.chunks(ADD_BATCH_SIZE) {
            let body = json!({ "uris": batch });
            // A lost batch would silently drop up to 100 tracks, so an
            // exhausted retry budget here aborts the export
            with_backoff(self.config.add_attempts, self.config.add_retry_delay, || {
                self.client
                    .request(account, Method::POST, &add_url, Some(&body))
            })
            .await?;
            exported += batch.len();
            debug!(exported, total = uris.len(), "added spotify batch");
        }

        Ok(ExportResult::new(
            Platform::Spotify,
            remote.id,
            remote.url,
            exported,
            failed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::http::AuthScheme;
    use crate::export::token::TokenManager;
    use crate::model::Song;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn exporter_for(server: &MockServer) -> SpotifyExporter {
        let config = Arc::new(ExportConfig {
            add_retry_delay: Duration::from_millis(1),
            ..Default::default()
        });
        let tokens = Arc::new(TokenManager::new(config.clone()));
        let client = Arc::new(ApiClient::new(Platform::Spotify, AuthScheme::Bearer, tokens));
        SpotifyExporter::with_base_url(client, config, server.uri())
    }

    fn song(id: &str) -> Song {
        Song {
            title: Some(format!("Track {id}")),
            artists: Some("Artist".into()),
            spotify_id: Some(id.into()),
        }
    }

    async fn mount_profile_and_create(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "user-1"})),
            )
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/users/user-1/playlists"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "pl-1",
                "name": "Road Trip",
                "external_urls": {"spotify": "https://open.spotify.com/playlist/pl-1"}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_happy_path_batches_both_uris_in_one_call() {
        let server = MockServer::start().await;
        mount_profile_and_create(&server).await;
        Mock::given(method("POST"))
            .and(path("/v1/playlists/pl-1/tracks"))
            .and(body_partial_json(serde_json::json!({
                "uris": ["spotify:track:abc", "spotify:track:def"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "snapshot_id": "snap-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let exporter = exporter_for(&server);
        let account = ProviderAccount::connected(Platform::Spotify, "token", None);
        let playlist = Playlist::new("Road Trip", vec![song("abc"), song("def")]);

        let result = exporter.export_playlist(&playlist, &account).await.unwrap();
        assert_eq!(result.exported_tracks, 2);
        assert_eq!(result.failed_tracks, 0);
        assert_eq!(result.playlist_id, "pl-1");
        assert_eq!(result.playlist_url, "https://open.spotify.com/playlist/pl-1");
        assert_eq!(result.platform, "spotify");
    }

    #[tokio::test]
    async fn test_songs_without_id_count_failed() {
        let server = MockServer::start().await;
        mount_profile_and_create(&server).await;
        Mock::given(method("POST"))
            .and(path("/v1/playlists/pl-1/tracks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "snapshot_id": "snap-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let exporter = exporter_for(&server);
        let account = ProviderAccount::connected(Platform::Spotify, "token", None);
        let playlist = Playlist::new(
            "Mixed",
            vec![
                song("abc"),
                Song {
                    title: Some("No Id".into()),
                    artists: Some("Someone".into()),
                    spotify_id: None,
                },
            ],
        );

        let result = exporter.export_playlist(&playlist, &account).await.unwrap();
        assert_eq!(result.exported_tracks, 1);
        assert_eq!(result.failed_tracks, 1);
    }

    #[tokio::test]
    async fn test_long_playlist_uses_multiple_batches() {
        let server = MockServer::start().await;
        mount_profile_and_create(&server).await;
        Mock::given(method("POST"))
            .and(path("/v1/playlists/pl-1/tracks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "snapshot_id": "snap"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let songs: Vec<Song> = (0..150).map(|i| song(&format!("id-{i}"))).collect();
        let exporter = exporter_for(&server);
        let account = ProviderAccount::connected(Platform::Spotify, "token", None);
        let playlist = Playlist::new("Long", songs);

        let result = exporter.export_playlist(&playlist, &account).await.unwrap();
        assert_eq!(result.exported_tracks, 150);
        assert_eq!(result.failed_tracks, 0);
    }

    #[tokio::test]
    async fn test_exhausted_add_retries_abort_the_export() {
        let server = MockServer::start().await;
        mount_profile_and_create(&server).await;
        // All three attempts fail; no fourth attempt is made
        Mock::given(method("POST"))
            .and(path("/v1/playlists/pl-1/tracks"))
            .respond_with(ResponseTemplate::new(502).set_body_json(serde_json::json!({
                "error": {"message": "Bad gateway", "status": 502}
            })))
            .expect(3)
            .mount(&server)
            .await;

        let exporter = exporter_for(&server);
        let account = ProviderAccount::connected(Platform::Spotify, "token", None);
        let playlist = Playlist::new("Doomed", vec![song("abc")]);

        let err = exporter
            .export_playlist(&playlist, &account)
            .await
            .unwrap_err();
        assert!(err.is_status(502));
    }

    #[tokio::test]
    async fn test_not_connected_makes_no_calls() {
        let server = MockServer::start().await;
        let exporter = exporter_for(&server);
        let account = ProviderAccount::new(
            Platform::Spotify,
            crate::export::domain::TokenSet::default(),
        );
        let playlist = Playlist::new("Road Trip", vec![song("abc")]);

        let err = exporter
            .export_playlist(&playlist, &account)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::NotConnected(Platform::Spotify)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_falls_back_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "user-1"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/users/user-1/playlists"))
            .and(body_partial_json(serde_json::json!({"name": "My Playlist"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "pl-2",
                "name": "My Playlist"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let exporter = exporter_for(&server);
        let account = ProviderAccount::connected(Platform::Spotify, "token", None);
        let playlist = Playlist::new("", vec![]);

        let result = exporter.export_playlist(&playlist, &account).await.unwrap();
        assert_eq!(result.exported_tracks, 0);
        assert_eq!(result.failed_tracks, 0);
        // URL rebuilt from id when external_urls is absent
        assert_eq!(result.playlist_url, "https://open.spotify.com/playlist/pl-2");
    }
}
