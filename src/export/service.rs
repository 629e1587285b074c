//! Export service - the top-level entry point.
//!
//! The high-level flow for exporting a playlist:
//! 1. Validate that the requested platform is supported
//! 2. Resolve the platform's export strategy
//! 3. Check that the account is connected
//! 4. Delegate to the strategy and return its result
//!
//! Failures inside a strategy are logged and wrapped in
//! [`ExportError::ExportFailed`]; the caller (a web controller) decides
//! how they map to response statuses. Nothing is swallowed here.

use std::sync::Arc;

use tracing::{error, info};

use super::config::ExportConfig;
use super::domain::{ExportError, ExportResult, ProviderAccount};
use super::factory::ExporterFactory;
use super::store::CredentialStore;
use super::token::TokenManager;
use crate::model::Playlist;

/// Exports playlists to streaming platforms.
pub struct ExportService {
    factory: ExporterFactory,
}

impl ExportService {
    /// Create a service with the given config.
    pub fn new(config: ExportConfig) -> Self {
        let config = Arc::new(config);
        let tokens = Arc::new(TokenManager::new(config.clone()));
        Self {
            factory: ExporterFactory::new(config, tokens),
        }
    }

    /// Create a service that persists refreshed tokens through the
    /// given store.
    pub fn with_store(config: ExportConfig, store: Arc<dyn CredentialStore>) -> Self {
        let config = Arc::new(config);
        let tokens = Arc::new(TokenManager::new(config.clone()).with_store(store));
        Self {
            factory: ExporterFactory::new(config, tokens),
        }
    }

    /// Create a service around a preconstructed factory.
    #[cfg(test)]
    pub fn from_factory(factory: ExporterFactory) -> Self {
        Self { factory }
    }

    /// True if the platform name maps to a supported platform.
    pub fn is_platform_supported(&self, platform_name: &str) -> bool {
        self.factory.is_supported(platform_name)
    }

    /// Export the playlist to the named platform.
    pub async fn export_playlist(
        &self,
        playlist: &Playlist,
        account: &ProviderAccount,
        platform_name: &str,
    ) -> Result<ExportResult, ExportError> {
        let exporter = self.factory.create(platform_name)?;
        let platform = exporter.platform();

        if !exporter.is_user_connected(account).await {
            return Err(ExportError::NotConnected(platform));
        }

        info!(
            platform = %platform,
            playlist = %playlist.name,
            songs = playlist.songs.len(),
            "starting export"
        );

        match exporter.export_playlist(playlist, account).await {
            Ok(result) => {
                info!(
                    platform = %platform,
                    playlist_id = %result.playlist_id,
                    exported = result.exported_tracks,
                    failed = result.failed_tracks,
                    "export finished"
                );
                Ok(result)
            }
            Err(err) => {
                error!(platform = %platform, error = %err, "export failed");
                Err(ExportError::ExportFailed {
                    platform,
                    message: err.to_string(),
                })
            }
        }
    }
}
