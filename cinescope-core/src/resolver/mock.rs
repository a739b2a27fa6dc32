//! Scripted fetcher for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{FetchError, SourceFetcher};
use crate::media::MediaReference;

/// Fetcher that replays a fixed outcome and counts calls.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedFetcher {
    outcome: Result<Vec<(String, String)>, String>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    pub(crate) fn returning(pairs: Vec<(String, String)>) -> Self {
        Self {
            outcome: Ok(pairs),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceFetcher for ScriptedFetcher {
    async fn fetch_sources(
        &self,
        _reference: &MediaReference,
    ) -> Result<Vec<(String, String)>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(pairs) => Ok(pairs.clone()),
            Err(reason) => Err(FetchError::Network {
                reason: reason.clone(),
            }),
        }
    }
}
