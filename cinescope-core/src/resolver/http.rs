//! HTTP fetcher for the streaming-sources backend.

use async_trait::async_trait;

use super::{FetchError, SourceFetcher, filter_source_payload};
use crate::config::BackendConfig;
use crate::media::{MediaReference, MediaType};

/// Fetches streaming sources from the backend proxy.
///
/// Hits `/movies/{id}/streaming-sources` for movies and
/// `/tv/{id}/streaming-sources?season=&episode=` for episodes, then filters
/// the payload down to provider/URL pairs.
#[derive(Debug, Clone)]
pub struct HttpSourceFetcher {
    client: reqwest::Client,
    base_url: String,
    config: BackendConfig,
}

impl HttpSourceFetcher {
    /// Creates a fetcher against the configured backend.
    pub fn new(config: &BackendConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            config: config.clone(),
        }
    }

    fn endpoint(&self, reference: &MediaReference) -> String {
        match reference.media_type {
            MediaType::Movie => {
                format!("{}/movies/{}/streaming-sources", self.base_url, reference.id)
            }
            MediaType::Tv => format!(
                "{}/tv/{}/streaming-sources?season={}&episode={}",
                self.base_url,
                reference.id,
                reference.season.unwrap_or_default(),
                reference.episode.unwrap_or_default(),
            ),
        }
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch_sources(
        &self,
        reference: &MediaReference,
    ) -> Result<Vec<(String, String)>, FetchError> {
        let endpoint = self.endpoint(reference);
        tracing::debug!(%endpoint, "fetching streaming sources");

        let response = self
            .client
            .get(&endpoint)
            .header("User-Agent", self.config.user_agent)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|error| FetchError::Network {
                reason: error.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                endpoint,
            });
        }

        let payload: serde_json::Value =
            response.json().await.map_err(|error| FetchError::Parse {
                reason: error.to_string(),
            })?;

        Ok(filter_source_payload(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_endpoint_has_no_query() {
        let fetcher = HttpSourceFetcher::new(&BackendConfig::default());
        let reference = MediaReference::movie("550").unwrap();
        assert_eq!(
            fetcher.endpoint(&reference),
            "http://localhost:5000/api/movies/550/streaming-sources"
        );
    }

    #[test]
    fn tv_endpoint_carries_season_and_episode() {
        let fetcher = HttpSourceFetcher::new(&BackendConfig::default());
        let reference = MediaReference::episode("1399", 2, 7).unwrap();
        assert_eq!(
            fetcher.endpoint(&reference),
            "http://localhost:5000/api/tv/1399/streaming-sources?season=2&episode=7"
        );
    }

    #[test]
    fn trailing_slash_in_base_url_is_trimmed() {
        let config = BackendConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            ..BackendConfig::default()
        };
        let fetcher = HttpSourceFetcher::new(&config);
        let reference = MediaReference::movie("550").unwrap();
        assert!(!fetcher.endpoint(&reference).contains("//movies"));
    }
}
