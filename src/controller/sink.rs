//! The rendering surface the controller writes to.

use std::fmt;

use crate::models::SourceSnippet;
use crate::render::RenderedAnswer;

/// A user-triggered action, each with its own control and busy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Submitting context text for indexing.
    Upload,
    /// Asking a question.
    Query,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// Visual tone of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// In-progress or informational.
    Neutral,
    Success,
    Error,
}

impl Tone {
    /// CSS color used by the page surface.
    pub fn css_color(self) -> &'static str {
        match self {
            Self::Neutral => "#a0a0a0",
            Self::Success => "#2ecc71",
            Self::Error => "#ff6b6b",
        }
    }
}

/// Output surface driven by [`ClientController`](super::ClientController).
///
/// Implementations decide how each update looks: the [`Page`](crate::Page)
/// model keeps HTML, the terminal sink prints lines, the TUI forwards
/// updates to its render loop.
pub trait OutputSink {
    /// Marks the control for `action` busy (disabled, loading) or idle.
    fn set_busy(&mut self, action: Action, busy: bool);

    /// Replaces the upload status line.
    fn show_status(&mut self, message: &str, tone: Tone);

    /// Replaces the answer area. An empty answer clears it.
    fn show_answer(&mut self, answer: &RenderedAnswer);

    /// Replaces the source list. An empty slice clears it.
    fn show_sources(&mut self, sources: &[SourceSnippet]);

    /// Shows or hides the result panel.
    fn set_results_visible(&mut self, visible: bool);

    /// Raises a blocking notice the user must acknowledge.
    fn alert(&mut self, message: &str);
}
