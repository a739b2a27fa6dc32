//! Actor implementation for the playback session.
//!
//! The actor owns the session state machine and processes commands
//! sequentially, so there is only ever one writer. Resolutions run as spawned
//! tasks that report back through an internal channel; the token guard in the
//! state machine discards results that arrive after the reference changed.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::commands::{ResolutionOutcome, SessionCommand, SessionSnapshot};
use super::handle::PlaybackHandle;
use super::state::PlaybackSession;
use crate::config::PlaybackConfig;
use crate::resolver::{SourceMap, SourceResolver};

/// Spawns the playback session actor and returns its handle.
///
/// One actor per watch view. Dropping every handle closes the command channel
/// and stops the actor; in-flight resolutions are discarded by the token
/// guard.
pub fn spawn_playback_session(config: PlaybackConfig, resolver: SourceResolver) -> PlaybackHandle {
    let (sender, receiver) = mpsc::channel(64);
    let (outcome_sender, outcome_receiver) = mpsc::unbounded_channel();
    let session = PlaybackSession::with_preferred_provider(config.preferred_provider.clone());

    tokio::spawn(async move {
        run_actor_loop(
            session,
            config,
            Arc::new(resolver),
            receiver,
            outcome_sender,
            outcome_receiver,
        )
        .await;
    });

    PlaybackHandle::new(sender)
}

async fn run_actor_loop(
    mut session: PlaybackSession,
    config: PlaybackConfig,
    resolver: Arc<SourceResolver>,
    mut receiver: mpsc::Receiver<SessionCommand>,
    outcome_sender: mpsc::UnboundedSender<ResolutionOutcome>,
    mut outcome_receiver: mpsc::UnboundedReceiver<ResolutionOutcome>,
) {
    tracing::debug!("playback session actor started");

    loop {
        tokio::select! {
            command = receiver.recv() => match command {
                Some(command) => {
                    if !handle_command(&mut session, &config, &resolver, &outcome_sender, command)
                    {
                        break;
                    }
                }
                // Every handle dropped: the view unmounted.
                None => break,
            },
            Some(outcome) = outcome_receiver.recv() => {
                session.commit(&outcome.token, outcome.map);
            }
        }
    }

    tracing::debug!("playback session actor stopped");
}

/// Handles a single command. Returns false to shut down.
fn handle_command(
    session: &mut PlaybackSession,
    config: &PlaybackConfig,
    resolver: &Arc<SourceResolver>,
    outcome_sender: &mpsc::UnboundedSender<ResolutionOutcome>,
    command: SessionCommand,
) -> bool {
    match command {
        SessionCommand::SetMedia {
            reference,
            responder,
        } => {
            if let Err(error) = reference.validate() {
                let _ = responder.send(Err(error));
                return true;
            }

            let token = session.begin_resolution(reference);
            let resolver = Arc::clone(resolver);
            let outcome_sender = outcome_sender.clone();
            let timeout = config.resolution_timeout;

            tokio::spawn(async move {
                let resolved = match timeout {
                    Some(limit) => {
                        match tokio::time::timeout(limit, resolver.resolve(token.reference())).await
                        {
                            Ok(result) => result,
                            Err(_) => {
                                tracing::warn!(
                                    reference = %token.reference(),
                                    "resolution timed out"
                                );
                                Ok(SourceMap::empty())
                            }
                        }
                    }
                    None => resolver.resolve(token.reference()).await,
                };

                // The reference was validated before the spawn, so resolve
                // can only fail on a malformed reference we never built.
                let map = resolved.unwrap_or_else(|error| {
                    tracing::warn!(%error, "resolution rejected reference");
                    SourceMap::empty()
                });
                let _ = outcome_sender.send(ResolutionOutcome { token, map });
            });

            let _ = responder.send(Ok(()));
        }

        SessionCommand::SelectProvider { key, responder } => {
            let result = session
                .select_provider(&key)
                .map(|()| snapshot_of(session));
            let _ = responder.send(result);
        }

        SessionCommand::Snapshot { responder } => {
            let _ = responder.send(snapshot_of(session));
        }

        SessionCommand::Shutdown => return false,
    }

    true
}

pub(super) fn snapshot_of(session: &PlaybackSession) -> SessionSnapshot {
    SessionSnapshot {
        status: session.status(),
        reference: session.reference().cloned(),
        selected_provider: session.selected_provider().map(str::to_string),
        url: session.current_url().map(str::to_string),
        available_providers: session.source_map().keys().map(str::to_string).collect(),
        error_message: session.error_message().map(str::to_string),
    }
}
