//! Export configuration.
//!
//! One [`ExportConfig`] is built by the caller (the web layer reads the
//! OAuth application credentials from its own secrets storage) and
//! handed to [`crate::export::ExportService::new`]. Everything has a
//! sensible default except the per-platform app credentials, which are
//! required for token refresh to succeed.

use std::time::Duration;

/// OAuth application credentials for one platform.
#[derive(Debug, Clone, Default)]
pub struct OauthApp {
    /// Client id issued by the platform's developer console
    pub client_id: String,
    /// Client secret issued alongside the id
    pub client_secret: String,
}

/// Configuration for the export service.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Spotify application credentials
    pub spotify: OauthApp,
    /// Google application credentials (used for YouTube)
    pub google: OauthApp,
    /// SoundCloud application credentials
    pub soundcloud: OauthApp,

    /// Description set on every created remote playlist
    pub playlist_description: String,
    /// Title used when the local playlist has an empty name
    pub default_playlist_name: String,

    /// Attempts per track-add call before giving up on that track
    pub add_attempts: u32,
    /// First retry delay; doubles on each subsequent retry
    pub add_retry_delay: Duration,
    /// Pause between successive YouTube add calls (their quota is tight)
    pub youtube_add_throttle: Duration,

    /// Result count requested per SoundCloud search query
    pub search_limit: u32,
    /// Minimum fuzzy-match score for a SoundCloud candidate to win
    pub match_threshold: i64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            spotify: OauthApp::default(),
            google: OauthApp::default(),
            soundcloud: OauthApp::default(),
            playlist_description: "Created with Playlist Porter".to_string(),
            default_playlist_name: "My Playlist".to_string(),
            add_attempts: 3,
            add_retry_delay: Duration::from_secs(1),
            youtube_add_throttle: Duration::from_millis(500),
            search_limit: 10,
            match_threshold: 15,
        }
    }
}

impl ExportConfig {
    /// The title to use for the remote playlist, falling back to the
    /// default when the local name is blank.
    pub fn remote_title<'a>(&'a self, name: &'a str) -> &'a str {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            &self.default_playlist_name
        } else {
            trimmed
        }
    }

    /// The app credentials for the given platform.
    pub fn oauth_app(&self, platform: super::Platform) -> &OauthApp {
        match platform {
            super::Platform::Spotify => &self.spotify,
            super::Platform::Google => &self.google,
            super::Platform::Soundcloud => &self.soundcloud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.add_attempts, 3);
        assert_eq!(config.add_retry_delay, Duration::from_secs(1));
        assert_eq!(config.youtube_add_throttle, Duration::from_millis(500));
        assert_eq!(config.match_threshold, 15);
        assert!(config.spotify.client_id.is_empty());
    }

    #[test]
    fn test_remote_title_fallback() {
        let config = ExportConfig::default();
        assert_eq!(config.remote_title("Road Trip"), "Road Trip");
        assert_eq!(config.remote_title("  trimmed  "), "trimmed");
        assert_eq!(config.remote_title(""), "My Playlist");
        assert_eq!(config.remote_title("   "), "My Playlist");
    }

    #[test]
    fn test_oauth_app_lookup() {
        let config = ExportConfig {
            spotify: OauthApp {
                client_id: "spotify-id".into(),
                client_secret: "spotify-secret".into(),
            },
            ..Default::default()
        };
        assert_eq!(
            config.oauth_app(crate::export::Platform::Spotify).client_id,
            "spotify-id"
        );
        assert!(
            config
                .oauth_app(crate::export::Platform::Google)
                .client_id
                .is_empty()
        );
    }
}
