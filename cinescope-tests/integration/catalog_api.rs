//! Catalog client against a live mock backend.

use axum::extract::{Path, Query};
use axum::routing::get;
use axum::{Json, Router};
use cinescope_catalog::{CatalogClient, DiscoverFilter};
use cinescope_core::config::BackendConfig;
use cinescope_core::media::MediaType;
use serde_json::{Value, json};

use crate::support::spawn_backend;

fn client_for(base_url: String) -> CatalogClient {
    CatalogClient::new(&BackendConfig {
        base_url,
        ..BackendConfig::default()
    })
}

fn fixed(payload: Value) -> axum::routing::MethodRouter {
    get(move || {
        let payload = payload.clone();
        async move { Json(payload) }
    })
}

#[tokio::test]
async fn popular_movies_parse_into_a_page() {
    let router = Router::new().route(
        "/api/movies/popular",
        fixed(json!({
            "data": {
                "page": 1,
                "results": [{
                    "id": 550,
                    "title": "Fight Club",
                    "poster_path": "/poster.jpg",
                    "backdrop_path": null,
                    "release_date": "1999-10-15",
                    "vote_average": 8.4,
                    "overview": "An insomniac office worker.",
                    "genre_ids": [18]
                }],
                "total_pages": 42,
                "total_results": 833
            }
        })),
    );
    let client = client_for(spawn_backend(router).await);

    let page = client
        .popular_movies(1, &DiscoverFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total_pages, 42);
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].title, "Fight Club");
    assert_eq!(page.results[0].release_year(), Some(1999));
}

#[tokio::test]
async fn discover_filters_reach_the_backend() {
    let router = Router::new().route(
        "/api/tv/popular",
        get(|Query(params): Query<Vec<(String, String)>>| async move {
            assert!(params.contains(&("with_genres".to_string(), "10765".to_string())));
            assert!(params.contains(&("first_air_date_year".to_string(), "2011".to_string())));
            Json(json!({"data": {"page": 1, "results": [], "total_pages": 0, "total_results": 0}}))
        }),
    );
    let client = client_for(spawn_backend(router).await);

    let filter = DiscoverFilter {
        with_genres: Some("10765".to_string()),
        year: Some(2011),
    };
    let page = client.popular_tv_shows(1, &filter).await.unwrap();
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn tv_show_detail_skips_specials_for_default_season() {
    let router = Router::new().route(
        "/api/tv/{id}",
        get(|Path(id): Path<String>| async move {
            Json(json!({
                "data": {
                    "id": id.parse::<u64>().unwrap(),
                    "name": "Game of Thrones",
                    "first_air_date": "2011-04-17",
                    "number_of_seasons": 2,
                    "seasons": [
                        {"season_number": 0, "episode_count": 14, "name": "Specials"},
                        {"season_number": 1, "episode_count": 10, "name": "Season 1"},
                        {"season_number": 2, "episode_count": 10, "name": "Season 2"}
                    ]
                }
            }))
        }),
    );
    let client = client_for(spawn_backend(router).await);

    let detail = client.tv_show_details("1399").await.unwrap();
    assert_eq!(detail.default_season(), Some(1));
}

#[tokio::test]
async fn season_detail_yields_first_episode_as_default() {
    let router = Router::new().route(
        "/api/tv/{id}/season/{season}",
        fixed(json!({
            "data": {
                "season_number": 2,
                "name": "Season 2",
                "episodes": [
                    {"episode_number": 1, "name": "The North Remembers"},
                    {"episode_number": 2, "name": "The Night Lands"}
                ]
            }
        })),
    );
    let client = client_for(spawn_backend(router).await);

    let season = client.tv_season("1399", 2).await.unwrap();
    assert_eq!(season.default_episode(), Some(1));
    assert_eq!(season.episodes.len(), 2);
}

#[tokio::test]
async fn genres_unwrap_the_nested_list() {
    let router = Router::new().route(
        "/api/movies/genres",
        fixed(json!({
            "data": {"genres": [{"id": 28, "name": "Action"}, {"id": 18, "name": "Drama"}]}
        })),
    );
    let client = client_for(spawn_backend(router).await);

    let genres = client.genres(MediaType::Movie).await.unwrap();
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[1].name, "Drama");
}

#[tokio::test]
async fn catalog_requests_identify_themselves_with_a_user_agent() {
    let router = Router::new().route(
        "/api/movies/genres",
        get(|headers: axum::http::HeaderMap| async move {
            let agent = headers
                .get("user-agent")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            assert_eq!(agent, BackendConfig::default().user_agent);
            Json(json!({"data": {"genres": [{"id": 28, "name": "Action"}]}}))
        }),
    );
    let client = client_for(spawn_backend(router).await);

    let genres = client.genres(MediaType::Movie).await.unwrap();
    assert_eq!(genres[0].name, "Action");
}

#[tokio::test]
async fn backend_errors_surface_with_status_and_endpoint() {
    let router = Router::new().route(
        "/api/movies/{id}",
        get(|| async { (axum::http::StatusCode::NOT_FOUND, "not found") }),
    );
    let client = client_for(spawn_backend(router).await);

    let error = client.movie_details("0").await.unwrap_err();
    match error {
        cinescope_catalog::CatalogError::Status { status, endpoint } => {
            assert_eq!(status, 404);
            assert_eq!(endpoint, "/movies/0");
        }
        other => panic!("unexpected error: {other}"),
    }
}
