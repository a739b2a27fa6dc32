//! Embed presenter driven by live session snapshots.

use std::sync::Arc;

use cinescope_core::config::PlaybackConfig;
use cinescope_core::embed::{EmbedPresenter, FRAME_FAILURE_MESSAGE, PresenterView};
use cinescope_core::media::MediaReference;
use cinescope_core::providers::ProviderCatalog;
use cinescope_core::resolver::SourceResolver;
use cinescope_core::session::spawn_playback_session;

use crate::support::{RoutedFetcher, settled_snapshot};

#[tokio::test]
async fn ready_snapshot_renders_a_sandboxed_frame() {
    let reference = MediaReference::movie("550").unwrap();
    let fetcher =
        RoutedFetcher::new().respond(&reference, &[("vidsrc", "https://a.example/550")]);
    let resolver =
        SourceResolver::new(Arc::new(fetcher), Arc::new(ProviderCatalog::default()));
    let handle = spawn_playback_session(PlaybackConfig::default(), resolver);
    let mut presenter = EmbedPresenter::new();

    handle.set_media(reference).await.unwrap();
    let snapshot = settled_snapshot(&handle).await;

    match presenter.view(&snapshot) {
        PresenterView::Frame(frame) => {
            let html = frame.html();
            assert!(html.contains(r#"src="https://a.example/550""#));
            assert!(html.contains("allow-scripts"));
            assert!(!html.contains("allow-top-navigation"));
            assert!(html.contains("allowfullscreen"));
        }
        other => panic!("expected frame, got {other:?}"),
    }

    handle.shutdown().await;
}

#[tokio::test]
async fn frame_failure_clears_when_another_provider_is_picked() {
    let reference = MediaReference::movie("550").unwrap();
    let fetcher = RoutedFetcher::new().respond(
        &reference,
        &[
            ("vidsrc", "https://a.example/550"),
            ("superembed", "https://c.example/550"),
        ],
    );
    let resolver =
        SourceResolver::new(Arc::new(fetcher), Arc::new(ProviderCatalog::default()));
    let handle = spawn_playback_session(PlaybackConfig::default(), resolver);
    let mut presenter = EmbedPresenter::new();

    handle.set_media(reference).await.unwrap();
    let snapshot = settled_snapshot(&handle).await;
    presenter.view(&snapshot);

    // The hosted player failed to load; the session state is untouched.
    presenter.frame_failed();
    match presenter.view(&snapshot) {
        PresenterView::FrameFailed {
            message,
            available_providers,
        } => {
            assert_eq!(message, FRAME_FAILURE_MESSAGE);
            assert_eq!(available_providers, vec!["vidsrc", "superembed"]);
        }
        other => panic!("expected frame failure, got {other:?}"),
    }

    let snapshot = handle.select_provider("superembed").await.unwrap();
    match presenter.view(&snapshot) {
        PresenterView::Frame(frame) => {
            assert_eq!(frame.url, "https://c.example/550");
        }
        other => panic!("expected frame after switch, got {other:?}"),
    }

    handle.shutdown().await;
}

#[tokio::test]
async fn resolving_and_idle_map_to_their_views() {
    let reference = MediaReference::movie("550").unwrap();
    let fetcher = RoutedFetcher::new()
        .respond(&reference, &[("vidsrc", "https://a.example/550")])
        .delay(&reference, std::time::Duration::from_millis(120));
    let resolver =
        SourceResolver::new(Arc::new(fetcher), Arc::new(ProviderCatalog::default()));
    let handle = spawn_playback_session(PlaybackConfig::default(), resolver);
    let mut presenter = EmbedPresenter::new();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(presenter.view(&snapshot), PresenterView::Idle);

    handle.set_media(reference).await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(presenter.view(&snapshot), PresenterView::Loading);

    let snapshot = settled_snapshot(&handle).await;
    assert!(matches!(presenter.view(&snapshot), PresenterView::Frame(_)));

    handle.shutdown().await;
}
