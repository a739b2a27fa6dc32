//! Playback session orchestration.
//!
//! [`PlaybackSession`] is the pure state machine; [`spawn_playback_session`]
//! wraps it in an actor that drives resolutions asynchronously and applies
//! the last-write-wins identity guard.

use thiserror::Error;

use crate::media::MediaError;

mod actor;
mod commands;
mod handle;
mod state;

pub use actor::spawn_playback_session;
pub use commands::{SessionCommand, SessionSnapshot};
pub use handle::PlaybackHandle;
pub use state::{PlaybackSession, PlaybackStatus, ResolutionToken, UNAVAILABLE_MESSAGE};

/// Errors from driving a playback session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The requested provider is not in the committed source map.
    #[error("Provider '{key}' is not available for the current title")]
    UnknownProvider {
        /// The rejected provider key.
        key: String,
    },

    /// No source map has been committed yet.
    #[error("No resolved sources to select from")]
    NotReady,

    /// The media reference was rejected before resolution.
    #[error(transparent)]
    InvalidReference(#[from] MediaError),

    /// The session actor has shut down.
    #[error("Playback session has shut down")]
    SessionClosed,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::PlaybackConfig;
    use crate::media::MediaReference;
    use crate::providers::ProviderCatalog;
    use crate::resolver::mock::ScriptedFetcher;
    use crate::resolver::SourceResolver;

    async fn settled_snapshot(handle: &PlaybackHandle) -> SessionSnapshot {
        for _ in 0..200 {
            let snapshot = handle.snapshot().await.unwrap();
            if snapshot.status != PlaybackStatus::Resolving {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("session never settled");
    }

    fn resolver(fetcher: ScriptedFetcher) -> SourceResolver {
        SourceResolver::new(Arc::new(fetcher), Arc::new(ProviderCatalog::default()))
    }

    #[tokio::test]
    async fn set_media_resolves_to_ready() {
        let fetcher = ScriptedFetcher::returning(vec![
            ("vidsrc".to_string(), "https://vidsrc.me/embed/movie?tmdb=550".to_string()),
            ("superembed".to_string(), "https://multiembed.mov/550".to_string()),
        ]);
        let handle = spawn_playback_session(PlaybackConfig::default(), resolver(fetcher));

        handle
            .set_media(MediaReference::movie("550").unwrap())
            .await
            .unwrap();

        let snapshot = settled_snapshot(&handle).await;
        assert_eq!(snapshot.status, PlaybackStatus::Ready);
        assert_eq!(snapshot.selected_provider.as_deref(), Some("vidsrc"));
        assert_eq!(
            snapshot.url.as_deref(),
            Some("https://vidsrc.me/embed/movie?tmdb=550")
        );
    }

    #[tokio::test]
    async fn invalid_reference_is_rejected_without_state_change() {
        let fetcher = ScriptedFetcher::returning(Vec::new());
        let handle = spawn_playback_session(PlaybackConfig::default(), resolver(fetcher));

        let malformed = MediaReference {
            media_type: crate::media::MediaType::Tv,
            id: "1399".to_string(),
            season: None,
            episode: Some(1),
        };
        assert!(matches!(
            handle.set_media(malformed).await,
            Err(SessionError::InvalidReference(_))
        ));

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.status, PlaybackStatus::Idle);
    }

    #[tokio::test]
    async fn provider_switch_does_not_refetch() {
        let fetcher = ScriptedFetcher::returning(vec![
            ("vidsrc".to_string(), "v".to_string()),
            ("superembed".to_string(), "s".to_string()),
        ]);
        let counting = fetcher.clone();
        let handle = spawn_playback_session(PlaybackConfig::default(), resolver(fetcher));

        handle
            .set_media(MediaReference::movie("550").unwrap())
            .await
            .unwrap();
        settled_snapshot(&handle).await;
        assert_eq!(counting.call_count(), 1);

        let snapshot = handle.select_provider("superembed").await.unwrap();
        assert_eq!(snapshot.selected_provider.as_deref(), Some("superembed"));
        assert_eq!(counting.call_count(), 1);
    }

    #[tokio::test]
    async fn shutdown_closes_the_handle() {
        let fetcher = ScriptedFetcher::returning(Vec::new());
        let handle = spawn_playback_session(PlaybackConfig::default(), resolver(fetcher));

        handle.shutdown().await;
        // The actor drains in its own task; give it a moment.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(handle.snapshot().await, Err(SessionError::SessionClosed));
    }
}
