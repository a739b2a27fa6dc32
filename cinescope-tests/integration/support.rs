//! Shared helpers for integration tests: in-process mock backend and
//! scripted source fetchers.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use cinescope_core::media::MediaReference;
use cinescope_core::resolver::{FetchError, SourceFetcher};
use cinescope_core::session::{PlaybackHandle, PlaybackStatus, SessionSnapshot};

/// Serves the router on an ephemeral port and returns the backend base URL
/// (including the `/api` prefix the clients expect).
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve backend");
    });

    format!("http://{addr}/api")
}

/// Polls the session until it leaves `Resolving`.
pub async fn settled_snapshot(handle: &PlaybackHandle) -> SessionSnapshot {
    for _ in 0..400 {
        let snapshot = handle.snapshot().await.expect("session alive");
        if snapshot.status != PlaybackStatus::Resolving {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("session never settled");
}

/// Fetcher scripted per media reference, with optional per-reference delays
/// and a call counter. References are keyed by their display form.
#[derive(Debug, Clone, Default)]
pub struct RoutedFetcher {
    responses: HashMap<String, Vec<(String, String)>>,
    delays: HashMap<String, Duration>,
    calls: Arc<AtomicUsize>,
}

impl RoutedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, reference: &MediaReference, pairs: &[(&str, &str)]) -> Self {
        self.responses.insert(
            reference.to_string(),
            pairs
                .iter()
                .map(|(key, url)| (key.to_string(), url.to_string()))
                .collect(),
        );
        self
    }

    pub fn delay(mut self, reference: &MediaReference, delay: Duration) -> Self {
        self.delays.insert(reference.to_string(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceFetcher for RoutedFetcher {
    async fn fetch_sources(
        &self,
        reference: &MediaReference,
    ) -> Result<Vec<(String, String)>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = reference.to_string();

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(&key) {
            Some(pairs) => Ok(pairs.clone()),
            None => Err(FetchError::Network {
                reason: format!("no scripted response for {key}"),
            }),
        }
    }
}
