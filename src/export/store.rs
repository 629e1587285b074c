//! Credential persistence seam.
//!
//! The exporter does not own credential storage - the web layer does.
//! After a successful token refresh the new tokens are pushed through
//! this trait so the caller's store stays consistent with the in-memory
//! account. The contract is: a refresh followed by a re-read must see
//! the new token.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::domain::{Platform, TokenSet};

/// Persists refreshed tokens back to the caller's credential storage.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist the given tokens for the platform. Errors are reported
    /// as a message; the export itself continues with the in-memory
    /// tokens either way.
    async fn persist(&self, platform: Platform, tokens: &TokenSet) -> Result<(), String>;
}

/// In-memory store, for tests and for callers that keep credentials
/// elsewhere entirely.
#[derive(Default)]
pub struct MemoryCredentialStore {
    saved: Mutex<HashMap<&'static str, TokenSet>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last tokens persisted for a platform, if any.
    pub async fn saved(&self, platform: Platform) -> Option<TokenSet> {
        self.saved.lock().await.get(platform.as_str()).cloned()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn persist(&self, platform: Platform, tokens: &TokenSet) -> Result<(), String> {
        self.saved
            .lock()
            .await
            .insert(platform.as_str(), tokens.clone());
        Ok(())
    }
}
