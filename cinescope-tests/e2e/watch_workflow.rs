//! Full watch workflow: catalog browse to playing frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, Query};
use axum::routing::get;
use axum::{Json, Router};
use cinescope_catalog::CatalogClient;
use cinescope_core::config::{BackendConfig, CineScopeConfig};
use cinescope_core::embed::{EmbedPresenter, PresenterView};
use cinescope_core::media::MediaReference;
use cinescope_core::resolver::SourceResolver;
use cinescope_core::session::{PlaybackStatus, spawn_playback_session};
use serde_json::json;

use crate::support::{settled_snapshot, spawn_backend};

#[derive(serde::Deserialize)]
struct EpisodeQuery {
    season: u32,
    episode: u32,
}

/// Backend serving show detail, season detail, and streaming sources, while
/// counting source requests.
fn backend_router(source_hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
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
        )
        .route(
            "/api/tv/{id}/season/{season}",
            get(|Path((_, season)): Path<(String, u32)>| async move {
                Json(json!({
                    "data": {
                        "season_number": season,
                        "episodes": [
                            {"episode_number": 1, "name": "Episode 1"},
                            {"episode_number": 2, "name": "Episode 2"}
                        ]
                    }
                }))
            }),
        )
        .route(
            "/api/tv/{id}/streaming-sources",
            get(
                move |Path(id): Path<String>, Query(query): Query<EpisodeQuery>| {
                    let hits = source_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Json(json!({
                            "vidsrc": format!(
                                "https://vidsrc.me/embed/tv?tmdb={id}&season={}&episode={}",
                                query.season, query.episode
                            ),
                            "superembed": format!(
                                "https://multiembed.mov/?tmdb={id}&s={}&e={}",
                                query.season, query.episode
                            ),
                            "imdbId": "tt0944947"
                        }))
                    }
                },
            ),
        )
}

#[tokio::test]
async fn browse_resolve_switch_and_advance_episode() {
    let source_hits = Arc::new(AtomicUsize::new(0));
    let base_url = spawn_backend(backend_router(source_hits.clone())).await;
    let config = CineScopeConfig {
        backend: BackendConfig {
            base_url,
            ..BackendConfig::default()
        },
        ..CineScopeConfig::default()
    };

    // Browse: show detail picks the first regular season, season detail
    // picks the first episode.
    let catalog = CatalogClient::new(&config.backend);
    let show = catalog.tv_show_details("1399").await.unwrap();
    let season_number = show.default_season().unwrap();
    assert_eq!(season_number, 1);
    let season = catalog.tv_season("1399", season_number).await.unwrap();
    let episode_number = season.default_episode().unwrap();
    assert_eq!(episode_number, 1);

    // Watch: resolve the chosen episode and render its frame.
    let resolver = SourceResolver::with_backend(&config);
    let handle = spawn_playback_session(config.playback, resolver);
    let mut presenter = EmbedPresenter::new();

    let reference =
        MediaReference::episode(show.id.to_string(), season_number, episode_number).unwrap();
    handle.set_media(reference).await.unwrap();
    let snapshot = settled_snapshot(&handle).await;

    assert_eq!(snapshot.status, PlaybackStatus::Ready);
    assert_eq!(snapshot.selected_provider.as_deref(), Some("vidsrc"));
    let frame_url = match presenter.view(&snapshot) {
        PresenterView::Frame(frame) => frame.url,
        other => panic!("expected frame, got {other:?}"),
    };
    assert_eq!(
        frame_url,
        "https://vidsrc.me/embed/tv?tmdb=1399&season=1&episode=1"
    );
    assert_eq!(source_hits.load(Ordering::SeqCst), 1);

    // Switch provider: pure state update, no new backend request.
    let snapshot = handle.select_provider("superembed").await.unwrap();
    match presenter.view(&snapshot) {
        PresenterView::Frame(frame) => {
            assert!(frame.url.starts_with("https://multiembed.mov/"));
        }
        other => panic!("expected frame after switch, got {other:?}"),
    }
    assert_eq!(source_hits.load(Ordering::SeqCst), 1);

    // Advance to the next episode: fresh resolution, selection carried over.
    let next = MediaReference::episode("1399", 1, 2).unwrap();
    handle.set_media(next).await.unwrap();
    let snapshot = settled_snapshot(&handle).await;

    assert_eq!(snapshot.status, PlaybackStatus::Ready);
    assert_eq!(snapshot.selected_provider.as_deref(), Some("superembed"));
    assert!(
        snapshot
            .url
            .as_deref()
            .unwrap()
            .contains("s=1&e=2")
    );
    assert_eq!(source_hits.load(Ordering::SeqCst), 2);

    handle.shutdown().await;
}
