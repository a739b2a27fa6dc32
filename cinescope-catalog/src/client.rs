//! HTTP client for the catalog backend.

use cinescope_core::config::BackendConfig;
use cinescope_core::media::MediaType;
use serde::de::DeserializeOwned;

use crate::errors::CatalogError;
use crate::types::{
    DataEnvelope, Genre, GenreList, MovieDetail, MovieSummary, Page, SeasonDetail, TvShowDetail,
    TvShowSummary,
};

/// Optional filters for listing and search endpoints.
#[derive(Debug, Clone, Default)]
pub struct DiscoverFilter {
    /// Comma-separated genre ids.
    pub with_genres: Option<String>,
    /// Release year (movies) or first-air year (tv shows).
    pub year: Option<u16>,
}

/// Client for the catalog/detail backend.
///
/// Every endpoint returns JSON in a `{ "data": ... }` envelope; this client
/// unwraps it and maps payloads onto the typed models.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    config: BackendConfig,
}

impl CatalogClient {
    /// Creates a client against the configured backend.
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config: config.clone(),
        }
    }

    /// Popular movies, optionally filtered.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn popular_movies(
        &self,
        page: u32,
        filter: &DiscoverFilter,
    ) -> crate::Result<Page<MovieSummary>> {
        self.get_json("/movies/popular", &movie_query(page, filter))
            .await
    }

    /// Top rated movies, optionally filtered.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn top_rated_movies(
        &self,
        page: u32,
        filter: &DiscoverFilter,
    ) -> crate::Result<Page<MovieSummary>> {
        self.get_json("/movies/top-rated", &movie_query(page, filter))
            .await
    }

    /// Upcoming movies, optionally filtered.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn upcoming_movies(
        &self,
        page: u32,
        filter: &DiscoverFilter,
    ) -> crate::Result<Page<MovieSummary>> {
        self.get_json("/movies/upcoming", &movie_query(page, filter))
            .await
    }

    /// Searches movies by free-text query.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> crate::Result<Page<MovieSummary>> {
        let params = vec![
            ("query".to_string(), query.to_string()),
            ("page".to_string(), page.to_string()),
        ];
        self.get_json("/movies/search", &params).await
    }

    /// Detail payload for one movie.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn movie_details(&self, id: &str) -> crate::Result<MovieDetail> {
        self.get_json(&format!("/movies/{id}"), &[]).await
    }

    /// Popular TV shows, optionally filtered.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn popular_tv_shows(
        &self,
        page: u32,
        filter: &DiscoverFilter,
    ) -> crate::Result<Page<TvShowSummary>> {
        self.get_json("/tv/popular", &tv_query(page, filter)).await
    }

    /// Top rated TV shows, optionally filtered.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn top_rated_tv_shows(
        &self,
        page: u32,
        filter: &DiscoverFilter,
    ) -> crate::Result<Page<TvShowSummary>> {
        self.get_json("/tv/top-rated", &tv_query(page, filter)).await
    }

    /// TV shows currently on the air, optionally filtered.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn on_the_air_tv_shows(
        &self,
        page: u32,
        filter: &DiscoverFilter,
    ) -> crate::Result<Page<TvShowSummary>> {
        self.get_json("/tv/on-the-air", &tv_query(page, filter)).await
    }

    /// Searches TV shows by free-text query.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn search_tv_shows(
        &self,
        query: &str,
        page: u32,
    ) -> crate::Result<Page<TvShowSummary>> {
        let params = vec![
            ("query".to_string(), query.to_string()),
            ("page".to_string(), page.to_string()),
        ];
        self.get_json("/search/tv", &params).await
    }

    /// Detail payload for one TV show, including its seasons.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn tv_show_details(&self, id: &str) -> crate::Result<TvShowDetail> {
        self.get_json(&format!("/tv/{id}"), &[]).await
    }

    /// Detail payload for one season, including its episodes.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn tv_season(&self, id: &str, season: u32) -> crate::Result<SeasonDetail> {
        self.get_json(&format!("/tv/{id}/season/{season}"), &[])
            .await
    }

    /// Genre list for the given media type.
    ///
    /// # Errors
    /// - `CatalogError::Network` - Transport failure
    /// - `CatalogError::Status` - Non-success HTTP status
    /// - `CatalogError::Parse` - Undecodable payload
    pub async fn genres(&self, media_type: MediaType) -> crate::Result<Vec<Genre>> {
        let endpoint = match media_type {
            MediaType::Movie => "/movies/genres",
            MediaType::Tv => "/tv/genres",
        };
        let list: GenreList = self.get_json(endpoint, &[]).await?;
        Ok(list.genres)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> crate::Result<T> {
        let url = format!("{}{endpoint}", self.base_url);
        tracing::debug!(%url, "catalog request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("User-Agent", self.config.user_agent)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|error| CatalogError::Network {
                reason: error.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let envelope: DataEnvelope<T> =
            response.json().await.map_err(|error| CatalogError::Parse {
                reason: error.to_string(),
            })?;
        Ok(envelope.data)
    }
}

fn movie_query(page: u32, filter: &DiscoverFilter) -> Vec<(String, String)> {
    discover_query(page, filter, "primary_release_year")
}

fn tv_query(page: u32, filter: &DiscoverFilter) -> Vec<(String, String)> {
    discover_query(page, filter, "first_air_date_year")
}

fn discover_query(page: u32, filter: &DiscoverFilter, year_key: &str) -> Vec<(String, String)> {
    let mut params = vec![("page".to_string(), page.to_string())];
    if let Some(genres) = &filter.with_genres {
        params.push(("with_genres".to_string(), genres.clone()));
    }
    if let Some(year) = filter.year {
        params.push((year_key.to_string(), year.to_string()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_filter_uses_release_year_key() {
        let filter = DiscoverFilter {
            with_genres: Some("28,12".to_string()),
            year: Some(1999),
        };
        let params = movie_query(2, &filter);
        assert!(params.contains(&("page".to_string(), "2".to_string())));
        assert!(params.contains(&("with_genres".to_string(), "28,12".to_string())));
        assert!(params.contains(&("primary_release_year".to_string(), "1999".to_string())));
    }

    #[test]
    fn tv_filter_uses_air_date_year_key() {
        let filter = DiscoverFilter {
            with_genres: None,
            year: Some(2011),
        };
        let params = tv_query(1, &filter);
        assert!(params.contains(&("first_air_date_year".to_string(), "2011".to_string())));
        assert!(!params.iter().any(|(key, _)| key == "with_genres"));
    }
}
