//! Command and snapshot types for the playback session actor.

use tokio::sync::oneshot;

use super::state::{PlaybackStatus, ResolutionToken};
use crate::media::{MediaError, MediaReference};
use crate::resolver::SourceMap;
use crate::session::SessionError;

/// Point-in-time view of the session, cloned out for presenters and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Current lifecycle status.
    pub status: PlaybackStatus,
    /// Reference being watched, once one was set.
    pub reference: Option<MediaReference>,
    /// Selected provider key, present once a map is committed.
    pub selected_provider: Option<String>,
    /// Embed URL for the selected provider, present only when ready.
    pub url: Option<String>,
    /// Resolved provider keys in canonical order.
    pub available_providers: Vec<String>,
    /// User-facing error message, present only in the error status.
    pub error_message: Option<String>,
}

/// Commands processed by the playback session actor.
#[derive(Debug)]
pub enum SessionCommand {
    /// Starts watching a new title or episode, superseding any in-flight
    /// resolution. Responds once the reference is accepted and resolving.
    SetMedia {
        /// Identity of the title or episode to watch.
        reference: MediaReference,
        /// Acknowledges acceptance or rejects a malformed reference.
        responder: oneshot::Sender<Result<(), MediaError>>,
    },

    /// Switches to another provider in the committed map. Pure state update.
    SelectProvider {
        /// Provider key to switch to.
        key: String,
        /// Reports the updated state or the rejection.
        responder: oneshot::Sender<Result<SessionSnapshot, SessionError>>,
    },

    /// Reads the current session state.
    Snapshot {
        /// Receives the current state.
        responder: oneshot::Sender<SessionSnapshot>,
    },

    /// Stops the actor.
    Shutdown,
}

/// Completed resolution reported back to the actor by a spawned task.
#[derive(Debug)]
pub struct ResolutionOutcome {
    /// Identity token captured when the resolution started.
    pub token: ResolutionToken,
    /// Resolved map; empty when resolution produced nothing or timed out.
    pub map: SourceMap,
}
