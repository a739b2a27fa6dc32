//! Source resolution against a live mock backend.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use cinescope_core::config::{BackendConfig, CineScopeConfig};
use cinescope_core::media::MediaReference;
use cinescope_core::providers::{EmbedProvider, ProviderCatalog};
use cinescope_core::resolver::SourceResolver;
use serde_json::json;

use crate::support::spawn_backend;

fn config_for(base_url: String) -> CineScopeConfig {
    CineScopeConfig {
        backend: BackendConfig {
            base_url,
            ..BackendConfig::default()
        },
        ..CineScopeConfig::default()
    }
}

#[tokio::test]
async fn backend_sources_are_filtered_and_ordered() {
    let payload = json!({
        "superembed": "https://multiembed.mov/?video_id=550&tmdb=1",
        "imdbId": "tt0137523",
        "vidsrc": "https://vidsrc.me/embed/movie?tmdb=550",
        "id": 550,
        "fsapi": null,
    });
    let router = Router::new().route(
        "/api/movies/{id}/streaming-sources",
        get(move || {
            let payload = payload.clone();
            async move { Json(payload) }
        }),
    );
    let base_url = spawn_backend(router).await;

    let resolver = SourceResolver::with_backend(&config_for(base_url));
    let reference = MediaReference::movie("550").unwrap();
    let map = resolver.resolve(&reference).await.unwrap();

    // Metadata keys and non-string values are dropped; catalog order wins
    // over payload order.
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["vidsrc", "superembed"]);
    assert_eq!(
        map.url_for("vidsrc"),
        Some("https://vidsrc.me/embed/movie?tmdb=550")
    );
}

#[tokio::test]
async fn requests_identify_themselves_with_a_user_agent() {
    let router = Router::new().route(
        "/api/movies/{id}/streaming-sources",
        get(|headers: axum::http::HeaderMap| async move {
            let agent = headers
                .get("user-agent")
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            assert_eq!(agent, BackendConfig::default().user_agent);
            Json(json!({"vidsrc": "https://backend.example/550"}))
        }),
    );
    let base_url = spawn_backend(router).await;

    let resolver = SourceResolver::with_backend(&config_for(base_url));
    let map = resolver
        .resolve(&MediaReference::movie("550").unwrap())
        .await
        .unwrap();
    // Template fallback would yield a vidsrc.me URL instead; seeing the
    // backend URL proves the identified request went through.
    assert_eq!(map.url_for("vidsrc"), Some("https://backend.example/550"));
}

#[tokio::test]
async fn data_envelope_is_unwrapped() {
    let payload = json!({
        "data": { "vidcloud": "https://vidcloud.example/embed/550" }
    });
    let router = Router::new().route(
        "/api/movies/{id}/streaming-sources",
        get(move || {
            let payload = payload.clone();
            async move { Json(payload) }
        }),
    );
    let base_url = spawn_backend(router).await;

    let resolver = SourceResolver::with_backend(&config_for(base_url));
    let map = resolver
        .resolve(&MediaReference::movie("550").unwrap())
        .await
        .unwrap();

    assert_eq!(map.url_for("vidcloud"), Some("https://vidcloud.example/embed/550"));
}

#[tokio::test]
async fn backend_error_falls_back_to_templates() {
    let router = Router::new().route(
        "/api/tv/{id}/streaming-sources",
        get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base_url = spawn_backend(router).await;

    let resolver = SourceResolver::with_backend(&config_for(base_url));
    let reference = MediaReference::episode("1399", 1, 1).unwrap();
    let map = resolver.resolve(&reference).await.unwrap();

    assert_eq!(
        map.url_for("vidsrc"),
        Some("https://vidsrc.me/embed/tv?tmdb=1399&season=1&episode=1")
    );
    assert!(map.contains_key("superembed"));
}

#[tokio::test]
async fn unreachable_backend_falls_back_to_templates() {
    // Nothing listens on this port.
    let resolver =
        SourceResolver::with_backend(&config_for("http://127.0.0.1:1/api".to_string()));
    let map = resolver
        .resolve(&MediaReference::movie("603").unwrap())
        .await
        .unwrap();

    assert!(!map.is_empty());
    assert_eq!(map.first_key(), Some("vidsrc"));
}

#[tokio::test]
async fn empty_payload_and_no_templates_yields_empty_map() {
    let router = Router::new().route(
        "/api/movies/{id}/streaming-sources",
        get(|| async { Json(json!({})) }),
    );
    let base_url = spawn_backend(router).await;

    // A catalog with no embed templates has nothing to synthesize from.
    let catalog = ProviderCatalog::new(vec![EmbedProvider {
        key: "gomo".to_string(),
        display_name: "Gomo".to_string(),
        embed_base: None,
    }]);
    let config = config_for(base_url);
    let resolver = SourceResolver::new(
        Arc::new(cinescope_core::resolver::HttpSourceFetcher::new(
            &config.backend,
        )),
        Arc::new(catalog),
    );

    let map = resolver
        .resolve(&MediaReference::movie("550").unwrap())
        .await
        .unwrap();
    assert!(map.is_empty());
}
