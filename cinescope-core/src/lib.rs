//! CineScope Core - Streaming source coordination

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Decides which external embed provider serves a given title or episode,
//! resolves that provider into a playable URL, and manages the player's
//! loading and error lifecycle as the user switches providers, seasons, or
//! episodes.

pub mod config;
pub mod embed;
pub mod media;
pub mod providers;
pub mod resolver;
pub mod session;
pub mod tracing_setup;

// Re-export main types
pub use config::CineScopeConfig;
pub use embed::{EmbedFrame, EmbedPresenter, PresenterView, SandboxPolicy};
pub use media::{MediaError, MediaReference, MediaType};
pub use providers::{ProviderCatalog, ProviderDescriptor};
pub use resolver::{SourceMap, SourceResolver};
pub use session::{
    PlaybackHandle, PlaybackSession, PlaybackStatus, SessionError, SessionSnapshot,
    spawn_playback_session,
};

/// Core errors that can bubble up from any CineScope subsystem.
#[derive(Debug, thiserror::Error)]
pub enum CineScopeError {
    /// Malformed media reference.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Playback session failure.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl CineScopeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            CineScopeError::Media(_) => "This title cannot be played".to_string(),
            CineScopeError::Session(error) => match error {
                SessionError::UnknownProvider { key } => {
                    format!("Server '{key}' is not available for this title")
                }
                SessionError::NotReady => session::UNAVAILABLE_MESSAGE.to_string(),
                SessionError::InvalidReference(_) => "This title cannot be played".to_string(),
                SessionError::SessionClosed => "Playback has ended".to_string(),
            },
        }
    }
}
