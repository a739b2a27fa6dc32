//! Source resolution: turning a media reference into provider embed URLs.
//!
//! Resolution asks the backend first and falls back to pure template
//! synthesis from the provider catalog. Transport failures never escape this
//! module; only an invalid media reference is an error. An empty map is a
//! valid result; the session decides what to do with it.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::CineScopeConfig;
use crate::media::{MediaError, MediaReference};
use crate::providers::ProviderCatalog;

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpSourceFetcher;

/// Resolved provider-to-URL mapping for one media reference.
///
/// Entries are held in canonical catalog order so "first available provider"
/// is deterministic regardless of backend payload ordering. Produced fresh per
/// reference and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    entries: Vec<(String, String)>,
}

impl SourceMap {
    /// The empty map. Not an error by itself; rendering against it is.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a map from raw provider/URL pairs, canonicalized to catalog
    /// order. Keys unknown to the catalog keep their payload order after the
    /// known ones; duplicate keys keep their first URL.
    pub fn canonical(catalog: &ProviderCatalog, raw: Vec<(String, String)>) -> Self {
        let mut entries: Vec<(String, String)> = Vec::with_capacity(raw.len());
        for (key, url) in raw {
            if !entries.iter().any(|(existing, _)| *existing == key) {
                entries.push((key, url));
            }
        }
        entries.sort_by_key(|(key, _)| catalog.position(key).unwrap_or(usize::MAX));
        Self { entries }
    }

    /// Whether no provider resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of resolved providers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// URL for a provider key, if it resolved.
    pub fn url_for(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, url)| url.as_str())
    }

    /// Whether the key resolved.
    pub fn contains_key(&self, key: &str) -> bool {
        self.url_for(key).is_some()
    }

    /// First available provider key in canonical order.
    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(key, _)| key.as_str())
    }

    /// Resolved keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Resolved entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, url)| (key.as_str(), url.as_str()))
    }
}

/// Errors from one backend fetch attempt.
///
/// These stay inside the resolver: every variant is recovered by falling back
/// to template synthesis.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure contacting the backend.
    #[error("Network error: {reason}")]
    Network {
        /// The reason for the network error.
        reason: String,
    },

    /// Backend answered with a non-success status.
    #[error("Backend returned HTTP {status} for {endpoint}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The endpoint that failed.
        endpoint: String,
    },

    /// Backend payload could not be decoded.
    #[error("Parse error: {reason}")]
    Parse {
        /// The reason for the parse error.
        reason: String,
    },
}

/// Trait for streaming-source backends.
///
/// Implementations fetch the raw provider/URL pairs for one media reference
/// (real HTTP backend, scripted fetchers for testing).
#[async_trait]
pub trait SourceFetcher: Send + Sync + std::fmt::Debug {
    /// Fetches raw provider/URL pairs for the reference.
    ///
    /// # Errors
    /// - `FetchError::Network` - Transport failure
    /// - `FetchError::Status` - Non-success HTTP status
    /// - `FetchError::Parse` - Undecodable payload
    async fn fetch_sources(
        &self,
        reference: &MediaReference,
    ) -> Result<Vec<(String, String)>, FetchError>;
}

/// Resolves media references into source maps.
///
/// Backend first, template synthesis on failure or empty payload. Each
/// resolution is independent; nothing is cached across references.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    fetcher: Arc<dyn SourceFetcher>,
    catalog: Arc<ProviderCatalog>,
}

impl SourceResolver {
    /// Creates a resolver over an explicit fetcher and catalog.
    pub fn new(fetcher: Arc<dyn SourceFetcher>, catalog: Arc<ProviderCatalog>) -> Self {
        Self { fetcher, catalog }
    }

    /// Creates a resolver backed by the HTTP backend and the default catalog.
    pub fn with_backend(config: &CineScopeConfig) -> Self {
        Self::new(
            Arc::new(HttpSourceFetcher::new(&config.backend)),
            Arc::new(ProviderCatalog::default()),
        )
    }

    /// The catalog this resolver synthesizes from.
    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// Resolves a reference into a source map.
    ///
    /// Network and parse failures are recovered by synthesizing URLs from the
    /// catalog's templates. An empty map is a valid return value.
    ///
    /// # Errors
    /// - `MediaError` - The reference is malformed; rejected before any request
    pub async fn resolve(&self, reference: &MediaReference) -> Result<SourceMap, MediaError> {
        reference.validate()?;

        match self.fetcher.fetch_sources(reference).await {
            Ok(raw) if !raw.is_empty() => {
                let map = SourceMap::canonical(&self.catalog, raw);
                tracing::debug!(%reference, providers = map.len(), "resolved via backend");
                Ok(map)
            }
            Ok(_) => {
                tracing::debug!(%reference, "backend returned no sources, synthesizing");
                Ok(self.synthesize(reference))
            }
            Err(error) => {
                tracing::warn!(%reference, %error, "backend resolution failed, synthesizing");
                Ok(self.synthesize(reference))
            }
        }
    }

    fn synthesize(&self, reference: &MediaReference) -> SourceMap {
        SourceMap::canonical(&self.catalog, self.catalog.synthesize(reference))
    }
}

/// Payload keys that carry metadata rather than a provider URL.
const METADATA_KEYS: &[&str] = &["imdbId", "id"];

/// Extracts provider/URL pairs from a backend payload.
///
/// Accepts either a bare object or a `{"data": {...}}` envelope. Non-string
/// values and metadata keys are dropped; any other shape yields no pairs.
pub fn filter_source_payload(payload: &serde_json::Value) -> Vec<(String, String)> {
    let object = match payload {
        serde_json::Value::Object(object) => match object.get("data") {
            Some(serde_json::Value::Object(inner)) => inner,
            _ => object,
        },
        _ => return Vec::new(),
    };

    object
        .iter()
        .filter(|(key, _)| !METADATA_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            value
                .as_str()
                .map(|url| (key.clone(), url.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::mock::ScriptedFetcher;
    use super::*;

    fn catalog() -> Arc<ProviderCatalog> {
        Arc::new(ProviderCatalog::default())
    }

    #[test]
    fn payload_filtering_drops_metadata_and_non_strings() {
        let payload = serde_json::json!({
            "vidsrc": "https://vidsrc.me/embed/movie?tmdb=550",
            "imdbId": "tt0137523",
            "id": 550,
            "superembed": { "nested": true },
            "gomo": "https://gomo.example/550"
        });

        let pairs = filter_source_payload(&payload);
        let keys: Vec<&str> = pairs.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["gomo", "vidsrc"]);
    }

    #[test]
    fn payload_filtering_unwraps_data_envelope() {
        let payload = serde_json::json!({
            "data": { "vidsrc": "https://vidsrc.me/embed/movie?tmdb=550" }
        });
        assert_eq!(filter_source_payload(&payload).len(), 1);
    }

    #[test]
    fn canonical_order_follows_catalog() {
        let raw = vec![
            ("gomo".to_string(), "g".to_string()),
            ("vidsrc".to_string(), "v".to_string()),
            ("unknownhost".to_string(), "u".to_string()),
            ("superembed".to_string(), "s".to_string()),
        ];
        let map = SourceMap::canonical(&ProviderCatalog::default(), raw);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["vidsrc", "superembed", "gomo", "unknownhost"]);
        assert_eq!(map.first_key(), Some("vidsrc"));
    }

    #[tokio::test]
    async fn backend_result_wins_over_templates() {
        let fetcher = ScriptedFetcher::returning(vec![
            ("superembed".to_string(), "https://backend/superembed".to_string()),
        ]);
        let resolver = SourceResolver::new(Arc::new(fetcher), catalog());
        let reference = MediaReference::movie("550").unwrap();

        let map = resolver.resolve(&reference).await.unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.url_for("superembed"), Some("https://backend/superembed"));
    }

    #[tokio::test]
    async fn network_failure_falls_back_to_templates() {
        let fetcher = ScriptedFetcher::failing("connection refused");
        let resolver = SourceResolver::new(Arc::new(fetcher), catalog());
        let reference = MediaReference::episode("1399", 1, 1).unwrap();

        let map = resolver.resolve(&reference).await.unwrap();
        assert_eq!(
            map.url_for("vidsrc"),
            Some("https://vidsrc.me/embed/tv?tmdb=1399&season=1&episode=1")
        );
    }

    #[tokio::test]
    async fn empty_backend_payload_falls_back_to_templates() {
        let fetcher = ScriptedFetcher::returning(Vec::new());
        let resolver = SourceResolver::new(Arc::new(fetcher), catalog());
        let reference = MediaReference::movie("550").unwrap();

        let map = resolver.resolve(&reference).await.unwrap();
        assert!(map.contains_key("vidsrc"));
        assert!(map.contains_key("superembed"));
    }

    #[tokio::test]
    async fn invalid_reference_fails_before_any_fetch() {
        let fetcher = ScriptedFetcher::returning(Vec::new());
        let resolver = SourceResolver::new(Arc::new(fetcher.clone()), catalog());
        let reference = MediaReference {
            media_type: crate::media::MediaType::Tv,
            id: "1399".to_string(),
            season: Some(1),
            episode: None,
        };

        assert!(resolver.resolve(&reference).await.is_err());
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn resolution_is_idempotent_for_same_reference() {
        let fetcher = ScriptedFetcher::returning(vec![
            ("vidsrc".to_string(), "https://backend/vidsrc".to_string()),
            ("gomo".to_string(), "https://backend/gomo".to_string()),
        ]);
        let resolver = SourceResolver::new(Arc::new(fetcher), catalog());
        let reference = MediaReference::movie("550").unwrap();

        let first = resolver.resolve(&reference).await.unwrap();
        let second = resolver.resolve(&reference).await.unwrap();
        assert_eq!(
            first.keys().collect::<Vec<_>>(),
            second.keys().collect::<Vec<_>>()
        );
    }
}
