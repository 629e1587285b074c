//! Playlist export module - reproduces local playlists on streaming platforms.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`spotify/dto.rs`, `youtube/dto.rs`, `soundcloud/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Token manager** (`token.rs`) - Per-platform OAuth refresh flows
//! - **HTTP client** (`http.rs`) - Auth header injection and 401 refresh-retry
//! - **Strategies** - One exporter per platform behind the `PlatformExporter` trait
//! - **Service** - High-level orchestration of the export flow
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test API contracts independently
//! 3. We can add platforms without changing business logic
//!
//! # Usage
//!
//! ```ignore
//! use playlist_porter::export::{ExportConfig, ExportService};
//!
//! let service = ExportService::new(ExportConfig::default());
//! let result = service.export_playlist(&playlist, &account, "soundcloud").await?;
//! println!("exported {} of {} tracks", result.exported_tracks, playlist.songs.len());
//! ```

mod backoff;
pub mod config;
pub mod domain;
pub mod factory;
pub mod http;
pub mod service;
pub mod soundcloud;
pub mod spotify;
pub mod store;
pub mod token;
pub mod traits;
pub mod youtube;

pub use config::{ExportConfig, OauthApp};
pub use domain::{ExportError, ExportResult, Platform, ProviderAccount, TokenSet};
pub use factory::ExporterFactory;
pub use service::ExportService;
pub use store::{CredentialStore, MemoryCredentialStore};
pub use token::TokenManager;
pub use traits::PlatformExporter;
