//! Provider switching is a pure state update over the committed source map.

use std::sync::Arc;

use cinescope_core::config::PlaybackConfig;
use cinescope_core::media::MediaReference;
use cinescope_core::providers::ProviderCatalog;
use cinescope_core::resolver::SourceResolver;
use cinescope_core::session::{SessionError, spawn_playback_session};

use crate::support::{RoutedFetcher, settled_snapshot};

#[tokio::test]
async fn switching_never_triggers_a_new_fetch() {
    let reference = MediaReference::movie("550").unwrap();
    let fetcher = RoutedFetcher::new().respond(
        &reference,
        &[
            ("vidsrc", "https://a.example/550"),
            ("vidcloud", "https://b.example/550"),
            ("superembed", "https://c.example/550"),
        ],
    );
    let resolver = SourceResolver::new(
        Arc::new(fetcher.clone()),
        Arc::new(ProviderCatalog::default()),
    );
    let handle = spawn_playback_session(PlaybackConfig::default(), resolver);

    handle.set_media(reference).await.unwrap();
    settled_snapshot(&handle).await;
    assert_eq!(fetcher.call_count(), 1);

    let snapshot = handle.select_provider("superembed").await.unwrap();
    assert_eq!(snapshot.url.as_deref(), Some("https://c.example/550"));
    let snapshot = handle.select_provider("vidcloud").await.unwrap();
    assert_eq!(snapshot.url.as_deref(), Some("https://b.example/550"));
    let snapshot = handle.select_provider("vidsrc").await.unwrap();
    assert_eq!(snapshot.url.as_deref(), Some("https://a.example/550"));

    assert_eq!(fetcher.call_count(), 1);
    handle.shutdown().await;
}

#[tokio::test]
async fn unknown_provider_is_rejected_and_selection_kept() {
    let reference = MediaReference::movie("550").unwrap();
    let fetcher =
        RoutedFetcher::new().respond(&reference, &[("vidsrc", "https://a.example/550")]);
    let resolver =
        SourceResolver::new(Arc::new(fetcher), Arc::new(ProviderCatalog::default()));
    let handle = spawn_playback_session(PlaybackConfig::default(), resolver);

    handle.set_media(reference).await.unwrap();
    settled_snapshot(&handle).await;

    let result = handle.select_provider("gomo").await;
    assert!(matches!(
        result,
        Err(SessionError::UnknownProvider { key }) if key == "gomo"
    ));

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.selected_provider.as_deref(), Some("vidsrc"));
    handle.shutdown().await;
}

#[tokio::test]
async fn switching_before_any_map_is_not_ready() {
    let fetcher = RoutedFetcher::new();
    let resolver =
        SourceResolver::new(Arc::new(fetcher), Arc::new(ProviderCatalog::default()));
    let handle = spawn_playback_session(PlaybackConfig::default(), resolver);

    let result = handle.select_provider("vidsrc").await;
    assert!(matches!(result, Err(SessionError::NotReady)));
    handle.shutdown().await;
}
