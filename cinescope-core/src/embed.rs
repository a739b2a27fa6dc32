//! Embed presenter: renders the resolved URL in an isolated frame.
//!
//! The presenter is purely presentational. It derives a view from session
//! snapshots, tracks fullscreen and frame-level load failures locally, and
//! never writes back into the session: a provider that 404s at render time
//! leaves the source map intact so the user can pick another server.

use crate::session::{PlaybackStatus, SessionSnapshot};

/// Message shown when the frame itself fails after a successful resolution.
pub const FRAME_FAILURE_MESSAGE: &str = "Unable to load this server. Try another one.";

/// Sandbox capabilities granted to the embed frame.
///
/// The default grants only what hosted players need to run. Top navigation is
/// never granted; there is deliberately no field for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SandboxPolicy {
    /// Allow scripts inside the frame (required by every hosted player).
    pub allow_scripts: bool,
    /// Allow the frame to keep its own origin.
    pub allow_same_origin: bool,
    /// Allow form submission for player UI.
    pub allow_forms: bool,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            allow_scripts: true,
            allow_same_origin: true,
            allow_forms: true,
        }
    }
}

impl SandboxPolicy {
    /// Value for the iframe `sandbox` attribute.
    pub fn attribute(&self) -> String {
        let mut tokens = Vec::new();
        if self.allow_scripts {
            tokens.push("allow-scripts");
        }
        if self.allow_same_origin {
            tokens.push("allow-same-origin");
        }
        if self.allow_forms {
            tokens.push("allow-forms");
        }
        tokens.join(" ")
    }
}

/// A renderable, sandboxed frame for one resolved URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedFrame {
    /// Resolved embed URL.
    pub url: String,
    /// Capability sandbox applied to the frame.
    pub sandbox: SandboxPolicy,
    /// Whether the fullscreen toggle is offered.
    pub allow_fullscreen: bool,
}

impl EmbedFrame {
    /// Renders the frame as an iframe element.
    ///
    /// The URL is attribute-escaped: backend-supplied URLs must not be able
    /// to break out of `src` and inject markup.
    pub fn html(&self) -> String {
        let fullscreen = if self.allow_fullscreen {
            " allowfullscreen"
        } else {
            ""
        };
        format!(
            r#"<iframe src="{}" sandbox="{}" allow="autoplay; encrypted-media; picture-in-picture"{fullscreen}></iframe>"#,
            escape_attribute(&self.url),
            self.sandbox.attribute(),
        )
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// What the watch view should currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterView {
    /// Nothing to show yet.
    Idle,
    /// Resolution in flight.
    Loading,
    /// Frame ready to render.
    Frame(EmbedFrame),
    /// Session-level failure: no provider resolved at all.
    Unavailable {
        /// Message for the user.
        message: String,
    },
    /// Frame-level failure: this server failed, others may work.
    FrameFailed {
        /// Message for the user.
        message: String,
        /// Providers still offered by the session.
        available_providers: Vec<String>,
    },
}

/// Derives frame views from session snapshots and tracks local frame state.
#[derive(Debug)]
pub struct EmbedPresenter {
    sandbox: SandboxPolicy,
    fullscreen: bool,
    frame_error: Option<String>,
    last_url: Option<String>,
}

impl EmbedPresenter {
    /// Creates a presenter with the default sandbox.
    pub fn new() -> Self {
        Self::with_sandbox(SandboxPolicy::default())
    }

    /// Creates a presenter with an explicit sandbox policy.
    pub fn with_sandbox(sandbox: SandboxPolicy) -> Self {
        Self {
            sandbox,
            fullscreen: false,
            frame_error: None,
            last_url: None,
        }
    }

    /// Derives the view for the current snapshot.
    ///
    /// A URL change (new provider or new title) clears any frame-level error,
    /// since the failure belonged to the previous frame.
    pub fn view(&mut self, snapshot: &SessionSnapshot) -> PresenterView {
        if snapshot.url != self.last_url {
            self.frame_error = None;
            self.last_url = snapshot.url.clone();
        }

        match snapshot.status {
            PlaybackStatus::Idle => PresenterView::Idle,
            PlaybackStatus::Resolving => PresenterView::Loading,
            PlaybackStatus::Error => PresenterView::Unavailable {
                message: snapshot
                    .error_message
                    .clone()
                    .unwrap_or_else(|| crate::session::UNAVAILABLE_MESSAGE.to_string()),
            },
            PlaybackStatus::Ready => {
                if let Some(message) = &self.frame_error {
                    return PresenterView::FrameFailed {
                        message: message.clone(),
                        available_providers: snapshot.available_providers.clone(),
                    };
                }
                match &snapshot.url {
                    Some(url) => PresenterView::Frame(EmbedFrame {
                        url: url.clone(),
                        sandbox: self.sandbox,
                        allow_fullscreen: true,
                    }),
                    None => PresenterView::Unavailable {
                        message: crate::session::UNAVAILABLE_MESSAGE.to_string(),
                    },
                }
            }
        }
    }

    /// Records a runtime load failure reported by the frame.
    ///
    /// Local to the presenter: the session keeps its source map and status.
    pub fn frame_failed(&mut self) {
        self.frame_error = Some(FRAME_FAILURE_MESSAGE.to_string());
    }

    /// Records a successful frame load, clearing any failure message.
    pub fn frame_loaded(&mut self) {
        self.frame_error = None;
    }

    /// Toggles fullscreen on the frame container. Presentation-only state.
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    /// Whether the frame container is fullscreen.
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}

impl Default for EmbedPresenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PlaybackStatus;

    fn ready_snapshot(url: &str, providers: &[&str]) -> SessionSnapshot {
        SessionSnapshot {
            status: PlaybackStatus::Ready,
            reference: None,
            selected_provider: providers.first().map(|key| key.to_string()),
            url: Some(url.to_string()),
            available_providers: providers.iter().map(|key| key.to_string()).collect(),
            error_message: None,
        }
    }

    #[test]
    fn sandbox_attribute_never_grants_top_navigation() {
        let attribute = SandboxPolicy::default().attribute();
        assert_eq!(attribute, "allow-scripts allow-same-origin allow-forms");
        assert!(!attribute.contains("top-navigation"));
    }

    #[test]
    fn ready_snapshot_renders_a_frame() {
        let mut presenter = EmbedPresenter::new();
        let view = presenter.view(&ready_snapshot("https://vidsrc.me/embed/movie?tmdb=550", &["vidsrc"]));

        match view {
            PresenterView::Frame(frame) => {
                assert!(frame.allow_fullscreen);
                let html = frame.html();
                assert!(html.contains(r#"src="https://vidsrc.me/embed/movie?tmdb=550""#));
                assert!(html.contains("sandbox="));
                assert!(html.contains("allowfullscreen"));
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn url_cannot_break_out_of_the_src_attribute() {
        let frame = EmbedFrame {
            url: r#"https://evil.example/"><script>alert(1)</script>"#.to_string(),
            sandbox: SandboxPolicy::default(),
            allow_fullscreen: true,
        };
        let html = frame.html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn query_separators_are_escaped_consistently() {
        let frame = EmbedFrame {
            url: "https://vidsrc.me/embed/tv?tmdb=1399&season=1&episode=1".to_string(),
            sandbox: SandboxPolicy::default(),
            allow_fullscreen: false,
        };
        let html = frame.html();
        assert!(html.contains("tmdb=1399&amp;season=1&amp;episode=1"));
        assert!(!html.contains("allowfullscreen"));
    }

    #[test]
    fn frame_failure_is_local_and_keeps_providers() {
        let mut presenter = EmbedPresenter::new();
        let snapshot = ready_snapshot("https://v", &["vidsrc", "superembed"]);
        presenter.view(&snapshot);

        presenter.frame_failed();
        match presenter.view(&snapshot) {
            PresenterView::FrameFailed {
                message,
                available_providers,
            } => {
                assert_eq!(message, FRAME_FAILURE_MESSAGE);
                assert_eq!(available_providers, vec!["vidsrc", "superembed"]);
            }
            other => panic!("expected frame failure, got {other:?}"),
        }
    }

    #[test]
    fn switching_url_clears_frame_failure() {
        let mut presenter = EmbedPresenter::new();
        presenter.view(&ready_snapshot("https://v", &["vidsrc", "superembed"]));
        presenter.frame_failed();

        let view = presenter.view(&ready_snapshot("https://s", &["vidsrc", "superembed"]));
        assert!(matches!(view, PresenterView::Frame(_)));
    }

    #[test]
    fn error_status_shows_session_message() {
        let mut presenter = EmbedPresenter::new();
        let snapshot = SessionSnapshot {
            status: PlaybackStatus::Error,
            reference: None,
            selected_provider: None,
            url: None,
            available_providers: Vec::new(),
            error_message: Some("Unable to load video".to_string()),
        };
        assert_eq!(
            presenter.view(&snapshot),
            PresenterView::Unavailable {
                message: "Unable to load video".to_string()
            }
        );
    }

    #[test]
    fn fullscreen_is_presentation_only_toggle() {
        let mut presenter = EmbedPresenter::new();
        assert!(!presenter.is_fullscreen());
        assert!(presenter.toggle_fullscreen());
        assert!(!presenter.toggle_fullscreen());
    }
}
