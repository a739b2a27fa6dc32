//! Handle for communicating with the playback session actor.

use tokio::sync::{mpsc, oneshot};

use super::SessionError;
use super::commands::{SessionCommand, SessionSnapshot};
use crate::media::MediaReference;

/// Handle for driving a playback session actor.
///
/// Clone freely: the page-level view and its child components can all hold
/// one. Commands are processed in order by a single actor task.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    sender: mpsc::Sender<SessionCommand>,
}

impl PlaybackHandle {
    /// Creates a new handle with the given command sender.
    pub(super) fn new(sender: mpsc::Sender<SessionCommand>) -> Self {
        Self { sender }
    }

    /// Starts watching a title or episode.
    ///
    /// Resolution continues in the background after this returns; poll
    /// [`snapshot`](Self::snapshot) to observe the outcome. Setting a new
    /// reference supersedes any resolution still in flight.
    ///
    /// # Errors
    /// - `SessionError::InvalidReference` - Reference rejected before any request
    /// - `SessionError::SessionClosed` - Actor has shut down
    pub async fn set_media(&self, reference: MediaReference) -> Result<(), SessionError> {
        let (responder, rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::SetMedia {
                reference,
                responder,
            })
            .await
            .map_err(|_| SessionError::SessionClosed)?;

        rx.await
            .map_err(|_| SessionError::SessionClosed)?
            .map_err(SessionError::from)
    }

    /// Switches to another provider from the resolved source map.
    ///
    /// Pure state update; never triggers a new resolution.
    ///
    /// # Errors
    /// - `SessionError::NotReady` - No committed source map yet
    /// - `SessionError::UnknownProvider` - Key absent from the committed map
    /// - `SessionError::SessionClosed` - Actor has shut down
    pub async fn select_provider(&self, key: &str) -> Result<SessionSnapshot, SessionError> {
        let (responder, rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::SelectProvider {
                key: key.to_string(),
                responder,
            })
            .await
            .map_err(|_| SessionError::SessionClosed)?;

        rx.await.map_err(|_| SessionError::SessionClosed)?
    }

    /// Reads the current session state.
    ///
    /// # Errors
    /// - `SessionError::SessionClosed` - Actor has shut down
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (responder, rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Snapshot { responder })
            .await
            .map_err(|_| SessionError::SessionClosed)?;

        rx.await.map_err(|_| SessionError::SessionClosed)
    }

    /// Stops the actor. Subsequent calls on any clone fail with
    /// `SessionError::SessionClosed`.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(SessionCommand::Shutdown).await;
    }
}
