//! Trait definition for platform export strategies.
//!
//! One implementation exists per platform (Spotify, YouTube via Google,
//! SoundCloud). The trait enables dependency injection and mocking:
//! the orchestrator and downstream tests work against
//! [`PlatformExporter`], never a concrete exporter.

use std::fmt;

use async_trait::async_trait;

use super::domain::{ExportError, ExportResult, Platform, ProviderAccount};
use crate::model::Playlist;

/// One platform's export strategy.
#[async_trait]
pub trait PlatformExporter: Send + Sync {
    /// The platform this strategy exports to.
    fn platform(&self) -> Platform;

    /// True iff the account belongs to this platform and stores an
    /// access token. No network call is made; token validity is only
    /// discovered when a call is attempted.
    async fn is_user_connected(&self, account: &ProviderAccount) -> bool {
        account.platform() == self.platform() && account.is_connected().await
    }

    /// Reproduce the playlist on the platform: create a remote
    /// playlist, resolve and add each track, and report the counts.
    ///
    /// Per-track failures degrade to the failed count; connection
    /// absence and playlist-creation failure abort the whole export.
    async fn export_playlist(
        &self,
        playlist: &Playlist,
        account: &ProviderAccount,
    ) -> Result<ExportResult, ExportError>;
}

impl fmt::Debug for dyn PlatformExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformExporter")
            .field("platform", &self.platform())
            .finish()
    }
}

/// Mock exporters for orchestrator and factory tests.
#[cfg(test)]
pub mod mocks {
    use super::*;

    /// Mock exporter returning a predefined result or error.
    pub struct MockExporter {
        pub platform: Platform,
        /// Result to return from export
        pub result: Option<ExportResult>,
        /// Error to return (takes precedence over result)
        pub error: Option<ExportError>,
    }

    impl MockExporter {
        /// A mock that exports every song successfully.
        pub fn exporting_all(platform: Platform, songs: usize) -> Self {
            Self {
                platform,
                result: Some(ExportResult::new(
                    platform,
                    "remote-id",
                    "https://example.com/playlist/remote-id",
                    songs,
                    0,
                )),
                error: None,
            }
        }

        /// A mock that fails with the given error.
        pub fn with_error(platform: Platform, error: ExportError) -> Self {
            Self {
                platform,
                result: None,
                error: Some(error),
            }
        }
    }

    #[async_trait]
    impl PlatformExporter for MockExporter {
        fn platform(&self) -> Platform {
            self.platform
        }

        async fn export_playlist(
            &self,
            _playlist: &Playlist,
            _account: &ProviderAccount,
        ) -> Result<ExportResult, ExportError> {
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            self.result
                .clone()
                .ok_or(ExportError::NotConnected(self.platform))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::export::domain::TokenSet;

        #[tokio::test]
        async fn test_default_connected_check() {
            let mock = MockExporter::exporting_all(Platform::Spotify, 2);

            let connected = ProviderAccount::connected(Platform::Spotify, "token", None);
            assert!(mock.is_user_connected(&connected).await);

            let empty = ProviderAccount::new(Platform::Spotify, TokenSet::default());
            assert!(!mock.is_user_connected(&empty).await);

            // Right token, wrong platform
            let other = ProviderAccount::connected(Platform::Google, "token", None);
            assert!(!mock.is_user_connected(&other).await);
        }

        #[tokio::test]
        async fn test_mock_returns_error_over_result() {
            let mock = MockExporter::with_error(
                Platform::Google,
                ExportError::NotConnected(Platform::Google),
            );
            let account = ProviderAccount::connected(Platform::Google, "token", None);
            let playlist = Playlist::new("Test", vec![]);

            let result = mock.export_playlist(&playlist, &account).await;
            assert!(matches!(result, Err(ExportError::NotConnected(_))));
        }
    }
}
