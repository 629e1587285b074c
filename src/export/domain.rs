//! Internal domain models for playlist export.
//!
//! These types are OUR types - they don't change when platform APIs
//! change. All external API responses get converted into these types
//! via the per-platform adapters.

use serde::Serialize;
use tokio::sync::Mutex;

/// A streaming platform we can export to.
///
/// Closed set: dispatch over platforms is checked exhaustively at
/// compile time instead of string-matching at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Spotify,
    /// YouTube, connected through a Google account
    Google,
    Soundcloud,
}

impl Platform {
    /// All supported platforms, in display order.
    pub const ALL: [Platform; 3] = [Platform::Spotify, Platform::Google, Platform::Soundcloud];

    /// Canonical lowercase name, as used by the web layer and the
    /// credential store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Spotify => "spotify",
            Platform::Google => "google",
            Platform::Soundcloud => "soundcloud",
        }
    }

    /// Exact-match lookup over the supported set.
    pub fn from_name(name: &str) -> Option<Platform> {
        match name {
            "spotify" => Some(Platform::Spotify),
            "google" => Some(Platform::Google),
            "soundcloud" => Some(Platform::Soundcloud),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OAuth tokens stored for one connected platform account.
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    /// Access token; required to attempt any call
    pub access_token: Option<String>,
    /// Refresh token; absence makes a 401 terminal rather than retryable
    pub refresh_token: Option<String>,
}

/// A user's connection to one platform.
///
/// The token set is the only shared mutable resource in an export: a
/// refresh updates it in place. It sits behind a per-account mutex so
/// concurrent exports for the same account serialize their token
/// reads/writes (last writer wins beyond that, matching the stored
/// credential record's semantics).
#[derive(Debug)]
pub struct ProviderAccount {
    platform: Platform,
    tokens: Mutex<TokenSet>,
}

impl ProviderAccount {
    /// Wrap stored tokens for the given platform.
    pub fn new(platform: Platform, tokens: TokenSet) -> Self {
        Self {
            platform,
            tokens: Mutex::new(tokens),
        }
    }

    /// Convenience constructor for a connected account.
    pub fn connected(
        platform: Platform,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self::new(
            platform,
            TokenSet {
                access_token: Some(access_token.into()),
                refresh_token,
            },
        )
    }

    /// The platform this account belongs to.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Current access token, if one is stored.
    pub async fn access_token(&self) -> Option<String> {
        self.tokens.lock().await.access_token.clone()
    }

    /// Current refresh token, if one is stored.
    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens.lock().await.refresh_token.clone()
    }

    /// True if a refresh token is stored.
    pub async fn has_refresh_token(&self) -> bool {
        self.tokens.lock().await.refresh_token.is_some()
    }

    /// True if an access token is stored.
    pub async fn is_connected(&self) -> bool {
        self.tokens.lock().await.access_token.is_some()
    }

    /// Replace the access token (and the refresh token, when the
    /// platform rotates it) after a successful refresh.
    pub async fn apply_refresh(&self, access_token: String, refresh_token: Option<String>) {
        let mut tokens = self.tokens.lock().await;
        tokens.access_token = Some(access_token);
        if refresh_token.is_some() {
            tokens.refresh_token = refresh_token;
        }
    }

    /// Snapshot of the current tokens, e.g. for persisting.
    pub async fn snapshot(&self) -> TokenSet {
        self.tokens.lock().await.clone()
    }
}

/// A freshly-created remote playlist, before any tracks are added.
#[derive(Debug, Clone)]
pub struct RemotePlaylist {
    /// Remote playlist id (opaque string on every platform)
    pub id: String,
    /// Shareable URL
    pub url: String,
}

/// Outcome of a completed export.
///
/// Remote ids are opaque strings on every platform, even where the
/// native id is numeric (SoundCloud).
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    /// Platform the playlist was exported to
    pub platform: String,
    /// Remote playlist id
    pub playlist_id: String,
    /// Shareable remote playlist URL
    pub playlist_url: String,
    /// Tracks successfully added
    pub exported_tracks: usize,
    /// Tracks that could not be resolved or added
    pub failed_tracks: usize,
}

impl ExportResult {
    /// Build a result for the given platform and remote playlist.
    pub fn new(
        platform: Platform,
        playlist_id: impl Into<String>,
        playlist_url: impl Into<String>,
        exported_tracks: usize,
        failed_tracks: usize,
    ) -> Self {
        Self {
            platform: platform.as_str().to_string(),
            playlist_id: playlist_id.into(),
            playlist_url: playlist_url.into(),
            exported_tracks,
            failed_tracks,
        }
    }
}

/// Errors that can occur during export.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("User is not connected to {0}")]
    NotConnected(Platform),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("No access token stored for this account")]
    NoAccessToken,

    #[error("No refresh token stored for this account")]
    NoRefreshToken,

    #[error("Failed to refresh {0} access token")]
    TokenRefreshFailed(Platform),

    /// Non-2xx response or wire-level failure. Transport errors carry
    /// status 0 - callers treat both the same way.
    #[error("{platform} API request failed (HTTP {status}): {message}")]
    ApiRequestFailed {
        platform: Platform,
        status: u16,
        message: String,
    },

    #[error("Access token expired and no refresh token is available")]
    TokenExpiredNoRefresh,

    #[error("Request failed after token refresh: {0}")]
    RefreshRetryFailed(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Export to {platform} failed: {message}")]
    ExportFailed { platform: Platform, message: String },
}

impl ExportError {
    /// True if this error came back with the given HTTP status.
    pub fn is_status(&self, code: u16) -> bool {
        matches!(self, ExportError::ApiRequestFailed { status, .. } if *status == code)
    }
}
