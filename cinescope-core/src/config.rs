//! Centralized configuration for CineScope.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Central configuration for all CineScope components.
///
/// Groups related configuration settings into logical sections.
#[derive(Debug, Clone, Default)]
pub struct CineScopeConfig {
    /// Backend proxy settings.
    pub backend: BackendConfig,
    /// Playback session settings.
    pub playback: PlaybackConfig,
}

/// Backend proxy configuration.
///
/// Controls how the catalog and source-resolution endpoints are reached.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend API, including the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout for backend calls.
    pub request_timeout: Duration,
    /// User agent for HTTP requests.
    pub user_agent: &'static str,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: "cinescope/0.1.0",
        }
    }
}

/// Playback session configuration.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Provider key preferred when a fresh source map is committed and no
    /// selection has been made yet.
    pub preferred_provider: Option<String>,
    /// Upper bound on one resolution attempt. `None` lets a hung backend
    /// leave the session resolving until a newer reference supersedes it.
    pub resolution_timeout: Option<Duration>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            preferred_provider: Some("vidsrc".to_string()),
            resolution_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = CineScopeConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:5000/api");
        assert_eq!(config.playback.preferred_provider.as_deref(), Some("vidsrc"));
        assert!(config.playback.resolution_timeout.is_none());
    }
}
