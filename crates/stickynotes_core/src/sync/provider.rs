//! Sync provider contract and the stub implementation.

use crate::model::note::Note;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Provider-specific connection settings, kept as opaque string pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl SyncConfig {
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}

/// Coarse provider lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Disabled,
    /// Enabled, but no remote backend exists.
    Unavailable,
}

/// Provider status snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub provider_id: String,
    pub state: SyncState,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("sync provider `{0}` is not enabled; enable it first")]
    NotEnabled(String),
    #[error("sync provider `{0}` is unavailable: remote sync is not implemented")]
    Unavailable(String),
}

/// Contract for remote sync integrations.
pub trait SyncProvider {
    fn provider_id(&self) -> &str;
    fn status(&self) -> SyncStatus;
    /// Stores configuration and marks the provider enabled.
    fn enable(&mut self, config: SyncConfig) -> Result<(), SyncError>;
    /// Pushes every note to the remote. Returns how many were accepted.
    fn push_all(&self, notes: &[Note]) -> Result<usize, SyncError>;
}

/// Placeholder provider. Accepts configuration, never talks to a network.
#[derive(Debug, Clone, Default)]
pub struct StubSyncProvider {
    config: Option<SyncConfig>,
}

impl StubSyncProvider {
    pub const PROVIDER_ID: &'static str = "stub";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    pub fn config(&self) -> Option<&SyncConfig> {
        self.config.as_ref()
    }
}

impl SyncProvider for StubSyncProvider {
    fn provider_id(&self) -> &str {
        Self::PROVIDER_ID
    }

    fn status(&self) -> SyncStatus {
        let (state, message) = if self.is_enabled() {
            (
                SyncState::Unavailable,
                "enabled, but remote sync is not implemented",
            )
        } else {
            (SyncState::Disabled, "sync is not enabled")
        };
        SyncStatus {
            provider_id: Self::PROVIDER_ID.to_string(),
            state,
            message: message.to_string(),
        }
    }

    fn enable(&mut self, config: SyncConfig) -> Result<(), SyncError> {
        warn!(
            "event=sync_enable module=sync status=stub provider={} settings={}",
            Self::PROVIDER_ID,
            config.settings.len()
        );
        self.config = Some(config);
        Ok(())
    }

    fn push_all(&self, notes: &[Note]) -> Result<usize, SyncError> {
        if !self.is_enabled() {
            return Err(SyncError::NotEnabled(Self::PROVIDER_ID.to_string()));
        }
        info!(
            "event=sync_push module=sync status=unavailable provider={} count={}",
            Self::PROVIDER_ID,
            notes.len()
        );
        Err(SyncError::Unavailable(Self::PROVIDER_ID.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{StubSyncProvider, SyncConfig, SyncError, SyncProvider, SyncState};
    use crate::model::note::{Note, NoteColor};

    #[test]
    fn push_before_enable_reports_not_enabled() {
        let provider = StubSyncProvider::new();
        assert_eq!(provider.status().state, SyncState::Disabled);
        let err = provider.push_all(&[]).expect_err("push must fail");
        assert!(matches!(err, SyncError::NotEnabled(_)));
    }

    #[test]
    fn enabled_stub_keeps_config_but_reports_unavailable() {
        let mut provider = StubSyncProvider::new();
        provider
            .enable(SyncConfig::default().with("project", "demo"))
            .expect("enable should succeed");
        assert_eq!(provider.status().state, SyncState::Unavailable);
        assert_eq!(
            provider
                .config()
                .and_then(|config| config.settings.get("project"))
                .map(String::as_str),
            Some("demo")
        );

        let notes = vec![Note::with_id("a", "x", NoteColor::Blue, 0)];
        let err = provider.push_all(&notes).expect_err("stub never pushes");
        assert_eq!(err, SyncError::Unavailable("stub".to_string()));
    }
}
