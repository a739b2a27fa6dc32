//! Data types for catalog listings, details, and seasons.
//!
//! Shapes follow the movie-database payloads the backend proxies through its
//! `data` envelope. Fields the UI does not strictly need are optional and
//! default-tolerant, since providers are loose about which ones they send.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Envelope every catalog response arrives in.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// 1-based page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Results on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Total pages available.
    #[serde(default)]
    pub total_pages: u32,
    /// Total results across all pages.
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

/// Genre id/name pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    /// Stable genre id.
    pub id: u32,
    /// Display name.
    pub name: String,
}

/// Genre list payload from the genre endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Movie entry in listing and search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    /// External database id.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Release date as `YYYY-MM-DD`; sometimes absent or empty.
    pub release_date: Option<String>,
    /// Average rating.
    pub vote_average: Option<f32>,
    /// Short synopsis.
    pub overview: Option<String>,
    /// Genre ids attached to the title.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl MovieSummary {
    /// Release year, when the release date parses.
    pub fn release_year(&self) -> Option<i32> {
        parse_year(self.release_date.as_deref())
    }
}

/// Full movie detail payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    /// External database id.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Short synopsis.
    pub overview: Option<String>,
    /// Release date as `YYYY-MM-DD`.
    pub release_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Average rating.
    pub vote_average: Option<f32>,
    /// Resolved genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

impl MovieDetail {
    /// Release year, when the release date parses.
    pub fn release_year(&self) -> Option<i32> {
        parse_year(self.release_date.as_deref())
    }
}

/// TV show entry in listing and search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvShowSummary {
    /// External database id.
    pub id: u64,
    /// Show name.
    pub name: String,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// First air date as `YYYY-MM-DD`.
    pub first_air_date: Option<String>,
    /// Average rating.
    pub vote_average: Option<f32>,
    /// Short synopsis.
    pub overview: Option<String>,
}

/// Season entry inside a show detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSummary {
    /// Season number; 0 is the specials season.
    pub season_number: u32,
    /// Episodes in the season, when the backend includes the count.
    pub episode_count: Option<u32>,
    /// Season display name.
    pub name: Option<String>,
}

/// Full TV show detail payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvShowDetail {
    /// External database id.
    pub id: u64,
    /// Show name.
    pub name: String,
    /// Short synopsis.
    pub overview: Option<String>,
    /// First air date as `YYYY-MM-DD`.
    pub first_air_date: Option<String>,
    /// Number of seasons.
    pub number_of_seasons: Option<u32>,
    /// Seasons, including specials.
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    /// Resolved genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Average rating.
    pub vote_average: Option<f32>,
    /// Poster image path.
    pub poster_path: Option<String>,
}

impl TvShowDetail {
    /// First regular season number, skipping the specials season 0.
    ///
    /// This is the season a watch view opens on.
    pub fn default_season(&self) -> Option<u32> {
        self.seasons
            .iter()
            .map(|season| season.season_number)
            .find(|&number| number > 0)
    }
}

/// Episode entry inside a season detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode number within the season.
    pub episode_number: u32,
    /// Episode title.
    pub name: Option<String>,
    /// Short synopsis.
    pub overview: Option<String>,
    /// Air date as `YYYY-MM-DD`.
    pub air_date: Option<String>,
    /// Still image path.
    pub still_path: Option<String>,
}

/// Full season detail payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonDetail {
    /// Season number.
    pub season_number: u32,
    /// Season display name.
    pub name: Option<String>,
    /// Episodes in air order.
    #[serde(default)]
    pub episodes: Vec<EpisodeSummary>,
}

impl SeasonDetail {
    /// Episode a watch view opens on after a season change.
    pub fn default_episode(&self) -> Option<u32> {
        self.episodes.first().map(|episode| episode.episode_number)
    }
}

fn parse_year(date: Option<&str>) -> Option<i32> {
    let date = date?;
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|parsed| parsed.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_tolerates_missing_counters() {
        let page: Page<MovieSummary> =
            serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(page.page, 1);
        assert!(page.results.is_empty());
    }

    #[test]
    fn movie_summary_parses_and_extracts_year() {
        let movie: MovieSummary = serde_json::from_str(
            r#"{"id": 550, "title": "Fight Club", "release_date": "1999-10-15"}"#,
        )
        .unwrap();
        assert_eq!(movie.release_year(), Some(1999));
    }

    #[test]
    fn empty_release_date_yields_no_year() {
        let movie: MovieSummary =
            serde_json::from_str(r#"{"id": 1, "title": "x", "release_date": ""}"#).unwrap();
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn default_season_skips_specials() {
        let show: TvShowDetail = serde_json::from_str(
            r#"{
                "id": 1399,
                "name": "Game of Thrones",
                "seasons": [
                    {"season_number": 0, "name": "Specials"},
                    {"season_number": 1, "episode_count": 10},
                    {"season_number": 2, "episode_count": 10}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(show.default_season(), Some(1));
    }

    #[test]
    fn default_episode_is_first_in_air_order() {
        let season: SeasonDetail = serde_json::from_str(
            r#"{
                "season_number": 1,
                "episodes": [
                    {"episode_number": 1, "name": "Winter Is Coming"},
                    {"episode_number": 2}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(season.default_episode(), Some(1));
    }
}
