//! Playlist Porter - multi-platform playlist export.
//!
//! This library reproduces a locally-built playlist on an external
//! streaming platform (Spotify, YouTube via Google, SoundCloud) through
//! each platform's public HTTP API. It is invoked by a web controller;
//! routing, persistence and OAuth connect flows live outside this crate.
//!
//! # Usage
//!
//! ```ignore
//! use playlist_porter::export::{ExportConfig, ExportService};
//!
//! let service = ExportService::new(ExportConfig::default());
//! let result = service.export_playlist(&playlist, &account, "spotify").await?;
//! println!("exported {} / failed {}", result.exported_tracks, result.failed_tracks);
//! ```

pub mod error;
pub mod export;
pub mod model;

pub use error::{Error, Result};
pub use export::{ExportConfig, ExportResult, ExportService, Platform};
pub use model::{Playlist, Song};
