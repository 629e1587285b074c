//! Strategy selection.
//!
//! Builds one exporter per supported platform at construction time and
//! dispatches on the requested platform name. Unknown names fail with
//! [`ExportError::UnsupportedPlatform`] before any credential or
//! network access happens.

use std::sync::Arc;

use super::config::ExportConfig;
use super::domain::{ExportError, Platform};
use super::http::{ApiClient, AuthScheme};
use super::soundcloud::SoundcloudExporter;
use super::spotify::SpotifyExporter;
use super::token::TokenManager;
use super::traits::PlatformExporter;
use super::youtube::YoutubeExporter;

/// Holds the per-platform export strategies.
pub struct ExporterFactory {
    spotify: Arc<dyn PlatformExporter>,
    youtube: Arc<dyn PlatformExporter>,
    soundcloud: Arc<dyn PlatformExporter>,
}

impl ExporterFactory {
    /// Build the real strategies, sharing one token manager.
    pub fn new(config: Arc<ExportConfig>, tokens: Arc<TokenManager>) -> Self {
        let spotify_client = Arc::new(ApiClient::new(
            Platform::Spotify,
            AuthScheme::Bearer,
            tokens.clone(),
        ));
        let youtube_client = Arc::new(ApiClient::new(
            Platform::Google,
            AuthScheme::Bearer,
            tokens.clone(),
        ));
        let soundcloud_client =
            Arc::new(ApiClient::new(Platform::Soundcloud, AuthScheme::OAuth, tokens));

        Self {
            spotify: Arc::new(SpotifyExporter::new(spotify_client, config.clone())),
            youtube: Arc::new(YoutubeExporter::new(youtube_client, config.clone())),
            soundcloud: Arc::new(SoundcloudExporter::new(soundcloud_client, config)),
        }
    }

    /// Build a factory from preconstructed strategies.
    #[cfg(test)]
    pub fn with_exporters(
        spotify: Arc<dyn PlatformExporter>,
        youtube: Arc<dyn PlatformExporter>,
        soundcloud: Arc<dyn PlatformExporter>,
    ) -> Self {
        Self {
            spotify,
            youtube,
            soundcloud,
        }
    }

    /// The strategy for the named platform.
    pub fn create(&self, platform_name: &str) -> Result<Arc<dyn PlatformExporter>, ExportError> {
        let platform = Platform::from_name(platform_name)
            .ok_or_else(|| ExportError::UnsupportedPlatform(platform_name.to_string()))?;
        Ok(self.for_platform(platform))
    }

    /// The strategy for a known platform.
    pub fn for_platform(&self, platform: Platform) -> Arc<dyn PlatformExporter> {
        match platform {
            Platform::Spotify => self.spotify.clone(),
            Platform::Google => self.youtube.clone(),
            Platform::Soundcloud => self.soundcloud.clone(),
        }
    }

    /// True if the name maps to a supported platform.
    pub fn is_supported(&self, platform_name: &str) -> bool {
        Platform::from_name(platform_name).is_some()
    }

    /// Every platform with its strategy, in display order.
    pub fn list_all(&self) -> Vec<(Platform, Arc<dyn PlatformExporter>)> {
        Platform::ALL
            .into_iter()
            .map(|platform| (platform, self.for_platform(platform)))
            .collect()
    }
}
