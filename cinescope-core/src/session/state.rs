//! Pure playback session state machine.
//!
//! All transitions are synchronous; the actor drives them from async events.
//! The identity-token guard lives here: a resolution result is only committed
//! when its token still matches the session's current generation, so a stale
//! completion can never overwrite state for a newer reference.

use super::SessionError;
use crate::media::MediaReference;
use crate::resolver::SourceMap;

/// User-facing message when no provider could be resolved at all.
pub const UNAVAILABLE_MESSAGE: &str = "Unable to load video";

/// Lifecycle status of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// No media reference set yet.
    Idle,
    /// A resolution is in flight for the current reference.
    Resolving,
    /// A non-empty source map is committed and a provider is selected.
    Ready,
    /// Resolution produced no usable sources.
    Error,
}

/// Identity token for one resolution attempt.
///
/// Captured when resolution begins, compared before commit. Supersession is
/// purely logical: a newer `begin_resolution` bumps the generation and the
/// stale token no longer matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionToken {
    generation: u64,
    reference: MediaReference,
}

impl ResolutionToken {
    /// The reference this resolution was started for.
    pub fn reference(&self) -> &MediaReference {
        &self.reference
    }

    /// Generation counter at capture time.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// State for one watch view: current reference, selection, sources, status.
///
/// Owned by a single view; there is exactly one writer, so no locking. Drop
/// the session to tear it down; pending resolutions are discarded by the
/// token guard, nothing else to clean up.
#[derive(Debug)]
pub struct PlaybackSession {
    reference: Option<MediaReference>,
    generation: u64,
    status: PlaybackStatus,
    source_map: SourceMap,
    selected_provider: Option<String>,
    preferred_provider: Option<String>,
    error_message: Option<String>,
}

impl PlaybackSession {
    /// Creates an idle session with no provider preference.
    pub fn new() -> Self {
        Self::with_preferred_provider(None)
    }

    /// Creates an idle session that prefers the given provider key when the
    /// first source map is committed.
    pub fn with_preferred_provider(preferred_provider: Option<String>) -> Self {
        Self {
            reference: None,
            generation: 0,
            status: PlaybackStatus::Idle,
            source_map: SourceMap::empty(),
            selected_provider: None,
            preferred_provider,
            error_message: None,
        }
    }

    /// Starts resolving a new reference, superseding any in-flight resolution.
    ///
    /// The previous selection is remembered so it carries over if the new map
    /// still offers it.
    pub fn begin_resolution(&mut self, reference: MediaReference) -> ResolutionToken {
        self.generation += 1;
        if let Some(selected) = self.selected_provider.take() {
            self.preferred_provider = Some(selected);
        }
        self.reference = Some(reference.clone());
        self.status = PlaybackStatus::Resolving;
        self.source_map = SourceMap::empty();
        self.error_message = None;

        tracing::debug!(%reference, generation = self.generation, "resolution started");
        ResolutionToken {
            generation: self.generation,
            reference,
        }
    }

    /// Commits a resolution result. Returns `false` when the token is stale
    /// (the reference changed since the resolution started) and the result
    /// was dropped.
    pub fn commit(&mut self, token: &ResolutionToken, map: SourceMap) -> bool {
        if token.generation != self.generation
            || self.reference.as_ref() != Some(&token.reference)
        {
            tracing::debug!(
                stale = token.generation,
                current = self.generation,
                "dropping superseded resolution result"
            );
            return false;
        }

        if map.is_empty() {
            self.status = PlaybackStatus::Error;
            self.error_message = Some(UNAVAILABLE_MESSAGE.to_string());
            self.source_map = map;
            tracing::debug!(reference = %token.reference, "no sources resolved");
            return true;
        }

        let carried = self
            .preferred_provider
            .as_deref()
            .filter(|key| map.contains_key(key))
            .map(str::to_string);
        let selected = carried.or_else(|| map.first_key().map(str::to_string));

        self.selected_provider = selected;
        self.source_map = map;
        self.status = PlaybackStatus::Ready;
        tracing::debug!(
            reference = %token.reference,
            provider = self.selected_provider.as_deref().unwrap_or(""),
            "session ready"
        );
        true
    }

    /// Switches to another provider key already present in the committed map.
    ///
    /// Pure in-memory update; never triggers a new resolution.
    ///
    /// # Errors
    /// - `SessionError::NotReady` - No committed source map to select from
    /// - `SessionError::UnknownProvider` - Key absent from the committed map
    pub fn select_provider(&mut self, key: &str) -> Result<(), SessionError> {
        if self.status != PlaybackStatus::Ready {
            return Err(SessionError::NotReady);
        }
        if !self.source_map.contains_key(key) {
            return Err(SessionError::UnknownProvider {
                key: key.to_string(),
            });
        }
        self.selected_provider = Some(key.to_string());
        Ok(())
    }

    /// Current status.
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Reference the session is currently tracking.
    pub fn reference(&self) -> Option<&MediaReference> {
        self.reference.as_ref()
    }

    /// Committed source map for the current reference.
    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Selected provider key, present only once a map is committed.
    pub fn selected_provider(&self) -> Option<&str> {
        self.selected_provider.as_deref()
    }

    /// Embed URL for the selected provider, present only when ready.
    pub fn current_url(&self) -> Option<&str> {
        if self.status != PlaybackStatus::Ready {
            return None;
        }
        self.selected_provider
            .as_deref()
            .and_then(|key| self.source_map.url_for(key))
    }

    /// User-facing error message, present only in the error status.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderCatalog;

    fn map(pairs: &[(&str, &str)]) -> SourceMap {
        SourceMap::canonical(
            &ProviderCatalog::default(),
            pairs
                .iter()
                .map(|(key, url)| (key.to_string(), url.to_string()))
                .collect(),
        )
    }

    #[test]
    fn commit_with_sources_reaches_ready_with_first_key() {
        let mut session = PlaybackSession::new();
        let token = session.begin_resolution(MediaReference::movie("550").unwrap());
        assert_eq!(session.status(), PlaybackStatus::Resolving);

        assert!(session.commit(
            &token,
            map(&[
                ("vidsrc", "https://vidsrc.me/embed/movie?tmdb=550"),
                ("superembed", "https://multiembed.mov/embed/movie?tmdb=550"),
            ])
        ));
        assert_eq!(session.status(), PlaybackStatus::Ready);
        assert_eq!(session.selected_provider(), Some("vidsrc"));
        assert_eq!(
            session.current_url(),
            Some("https://vidsrc.me/embed/movie?tmdb=550")
        );
    }

    #[test]
    fn empty_map_reaches_error_with_stable_message() {
        let mut session = PlaybackSession::new();
        let token = session.begin_resolution(MediaReference::movie("550").unwrap());

        assert!(session.commit(&token, SourceMap::empty()));
        assert_eq!(session.status(), PlaybackStatus::Error);
        assert_eq!(session.error_message(), Some(UNAVAILABLE_MESSAGE));
        assert!(session.current_url().is_none());
    }

    #[test]
    fn stale_token_is_dropped() {
        let mut session = PlaybackSession::new();
        let stale = session.begin_resolution(MediaReference::episode("1399", 1, 1).unwrap());
        let current = session.begin_resolution(MediaReference::episode("1399", 1, 2).unwrap());

        assert!(!session.commit(&stale, map(&[("vidsrc", "https://stale")])));
        assert_eq!(session.status(), PlaybackStatus::Resolving);

        assert!(session.commit(&current, map(&[("vidsrc", "https://current")])));
        assert_eq!(session.current_url(), Some("https://current"));
    }

    #[test]
    fn provider_switch_is_pure_and_validated() {
        let mut session = PlaybackSession::new();
        let token = session.begin_resolution(MediaReference::movie("550").unwrap());
        session.commit(&token, map(&[("vidsrc", "v"), ("superembed", "s")]));

        session.select_provider("superembed").unwrap();
        assert_eq!(session.selected_provider(), Some("superembed"));
        assert_eq!(session.current_url(), Some("s"));

        assert!(matches!(
            session.select_provider("gomo"),
            Err(SessionError::UnknownProvider { .. })
        ));
    }

    #[test]
    fn selection_carries_over_when_still_available() {
        let mut session = PlaybackSession::new();
        let token = session.begin_resolution(MediaReference::episode("1399", 1, 1).unwrap());
        session.commit(&token, map(&[("vidsrc", "v1"), ("superembed", "s1")]));
        session.select_provider("superembed").unwrap();

        let token = session.begin_resolution(MediaReference::episode("1399", 2, 1).unwrap());
        session.commit(&token, map(&[("vidsrc", "v2"), ("superembed", "s2")]));
        assert_eq!(session.selected_provider(), Some("superembed"));
        assert_eq!(session.current_url(), Some("s2"));
    }

    #[test]
    fn selection_falls_back_to_first_when_gone() {
        let mut session = PlaybackSession::new();
        let token = session.begin_resolution(MediaReference::episode("1399", 1, 1).unwrap());
        session.commit(&token, map(&[("gomo", "g1")]));
        assert_eq!(session.selected_provider(), Some("gomo"));

        let token = session.begin_resolution(MediaReference::episode("1399", 2, 1).unwrap());
        session.commit(&token, map(&[("vidsrc", "v2"), ("superembed", "s2")]));
        assert_eq!(session.selected_provider(), Some("vidsrc"));
    }

    #[test]
    fn preferred_provider_applies_on_first_commit() {
        let mut session =
            PlaybackSession::with_preferred_provider(Some("superembed".to_string()));
        let token = session.begin_resolution(MediaReference::movie("550").unwrap());
        session.commit(&token, map(&[("vidsrc", "v"), ("superembed", "s")]));
        assert_eq!(session.selected_provider(), Some("superembed"));
    }

    #[test]
    fn select_before_commit_is_rejected() {
        let mut session = PlaybackSession::new();
        assert!(matches!(
            session.select_provider("vidsrc"),
            Err(SessionError::NotReady)
        ));
    }
}
