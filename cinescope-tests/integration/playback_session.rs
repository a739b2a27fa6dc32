//! Playback session lifecycle against scripted fetchers and a live backend.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::{Json, Router};
use cinescope_core::config::{BackendConfig, CineScopeConfig, PlaybackConfig};
use cinescope_core::media::MediaReference;
use cinescope_core::providers::ProviderCatalog;
use cinescope_core::resolver::SourceResolver;
use cinescope_core::session::{PlaybackStatus, SessionError, UNAVAILABLE_MESSAGE, spawn_playback_session};
use serde_json::json;

use crate::support::{RoutedFetcher, settled_snapshot, spawn_backend};

fn resolver_over(fetcher: RoutedFetcher) -> SourceResolver {
    SourceResolver::new(Arc::new(fetcher), Arc::new(ProviderCatalog::default()))
}

#[tokio::test]
async fn movie_resolves_to_ready_via_backend() {
    let payload = json!({
        "vidsrc": "https://vidsrc.me/embed/movie?tmdb=550",
        "vidcloud": "https://vidcloud.example/550",
    });
    let router = Router::new().route(
        "/api/movies/{id}/streaming-sources",
        get(move || {
            let payload = payload.clone();
            async move { Json(payload) }
        }),
    );
    let base_url = spawn_backend(router).await;

    let config = CineScopeConfig {
        backend: BackendConfig {
            base_url,
            ..BackendConfig::default()
        },
        ..CineScopeConfig::default()
    };
    let resolver = SourceResolver::with_backend(&config);
    let handle = spawn_playback_session(config.playback, resolver);

    handle
        .set_media(MediaReference::movie("550").unwrap())
        .await
        .unwrap();
    let snapshot = settled_snapshot(&handle).await;

    assert_eq!(snapshot.status, PlaybackStatus::Ready);
    // Preferred provider is present in the map, so it wins.
    assert_eq!(snapshot.selected_provider.as_deref(), Some("vidsrc"));
    assert_eq!(
        snapshot.url.as_deref(),
        Some("https://vidsrc.me/embed/movie?tmdb=550")
    );
    assert_eq!(snapshot.available_providers, vec!["vidsrc", "vidcloud"]);

    handle.shutdown().await;
}

#[tokio::test]
async fn late_resolution_for_old_reference_is_dropped() {
    let slow = MediaReference::episode("1399", 1, 1).unwrap();
    let fast = MediaReference::episode("1399", 1, 2).unwrap();
    let fetcher = RoutedFetcher::new()
        .respond(&slow, &[("vidsrc", "https://old.example/s1e1")])
        .delay(&slow, Duration::from_millis(150))
        .respond(&fast, &[("vidsrc", "https://new.example/s1e2")]);

    let handle = spawn_playback_session(PlaybackConfig::default(), resolver_over(fetcher));

    handle.set_media(slow).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.set_media(fast.clone()).await.unwrap();

    let snapshot = settled_snapshot(&handle).await;
    assert_eq!(snapshot.url.as_deref(), Some("https://new.example/s1e2"));

    // Give the superseded resolution time to land; it must not be applied.
    tokio::time::sleep(Duration::from_millis(250)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.status, PlaybackStatus::Ready);
    assert_eq!(snapshot.reference, Some(fast));
    assert_eq!(snapshot.url.as_deref(), Some("https://new.example/s1e2"));

    handle.shutdown().await;
}

#[tokio::test]
async fn selection_carries_over_when_new_map_still_has_it() {
    let first = MediaReference::episode("1399", 1, 1).unwrap();
    let second = MediaReference::episode("1399", 1, 2).unwrap();
    let fetcher = RoutedFetcher::new()
        .respond(
            &first,
            &[
                ("vidsrc", "https://a.example/s1e1"),
                ("superembed", "https://b.example/s1e1"),
            ],
        )
        .respond(
            &second,
            &[
                ("vidsrc", "https://a.example/s1e2"),
                ("superembed", "https://b.example/s1e2"),
            ],
        );

    let handle = spawn_playback_session(PlaybackConfig::default(), resolver_over(fetcher));

    handle.set_media(first).await.unwrap();
    settled_snapshot(&handle).await;
    let snapshot = handle.select_provider("superembed").await.unwrap();
    assert_eq!(snapshot.url.as_deref(), Some("https://b.example/s1e1"));

    handle.set_media(second).await.unwrap();
    let snapshot = settled_snapshot(&handle).await;

    assert_eq!(snapshot.selected_provider.as_deref(), Some("superembed"));
    assert_eq!(snapshot.url.as_deref(), Some("https://b.example/s1e2"));

    handle.shutdown().await;
}

#[tokio::test]
async fn selection_falls_back_to_first_when_provider_disappears() {
    let first = MediaReference::episode("1399", 1, 1).unwrap();
    let second = MediaReference::episode("1399", 2, 1).unwrap();
    let fetcher = RoutedFetcher::new()
        .respond(
            &first,
            &[
                ("vidsrc", "https://a.example/s1e1"),
                ("fsapi", "https://c.example/s1e1"),
            ],
        )
        .respond(&second, &[("vidsrc", "https://a.example/s2e1")]);

    let handle = spawn_playback_session(PlaybackConfig::default(), resolver_over(fetcher));

    handle.set_media(first).await.unwrap();
    settled_snapshot(&handle).await;
    handle.select_provider("fsapi").await.unwrap();

    handle.set_media(second).await.unwrap();
    let snapshot = settled_snapshot(&handle).await;

    assert_eq!(snapshot.selected_provider.as_deref(), Some("vidsrc"));
    assert_eq!(snapshot.url.as_deref(), Some("https://a.example/s2e1"));

    handle.shutdown().await;
}

#[tokio::test]
async fn empty_map_reports_unavailable() {
    let reference = MediaReference::movie("550").unwrap();
    let fetcher = RoutedFetcher::new().respond(&reference, &[]);
    // No-template catalog: the empty backend payload has nothing to fall
    // back to.
    let resolver = SourceResolver::new(
        Arc::new(fetcher),
        Arc::new(ProviderCatalog::new(Vec::new())),
    );
    let handle = spawn_playback_session(PlaybackConfig::default(), resolver);

    handle.set_media(reference).await.unwrap();
    let snapshot = settled_snapshot(&handle).await;

    assert_eq!(snapshot.status, PlaybackStatus::Error);
    assert_eq!(snapshot.error_message.as_deref(), Some(UNAVAILABLE_MESSAGE));
    assert_eq!(snapshot.url, None);
    assert!(snapshot.available_providers.is_empty());

    handle.shutdown().await;
}

#[tokio::test]
async fn invalid_reference_is_rejected_without_state_change() {
    let reference = MediaReference::movie("550").unwrap();
    let fetcher = RoutedFetcher::new().respond(&reference, &[("vidsrc", "https://a.example/550")]);
    let handle = spawn_playback_session(PlaybackConfig::default(), resolver_over(fetcher));

    handle.set_media(reference).await.unwrap();
    settled_snapshot(&handle).await;

    let bad = MediaReference {
        media_type: cinescope_core::media::MediaType::Tv,
        id: "1399".to_string(),
        season: Some(1),
        episode: None,
    };
    let result = handle.set_media(bad).await;
    assert!(matches!(result, Err(SessionError::InvalidReference(_))));

    // The session keeps playing the previous title.
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.status, PlaybackStatus::Ready);
    assert_eq!(snapshot.url.as_deref(), Some("https://a.example/550"));

    handle.shutdown().await;
}

#[tokio::test]
async fn calls_fail_after_shutdown() {
    let fetcher = RoutedFetcher::new();
    let handle = spawn_playback_session(PlaybackConfig::default(), resolver_over(fetcher));

    handle.shutdown().await;
    // The actor drains and exits; commands on any clone now fail.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let result = handle.snapshot().await;
    assert!(matches!(result, Err(SessionError::SessionClosed)));
}
