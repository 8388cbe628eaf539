use std::sync::mpsc::Sender;

use crate::controller::{Action, OutputSink, Tone};
use crate::models::SourceSnippet;
use crate::render::RenderedAnswer;

/// Application state for the TUI.
///
/// Holds the two inputs, the last status line, the rendered result and the
/// busy state of each action. Controller updates arrive as [`UiUpdate`]s and
/// are applied through the same [`OutputSink`] interface every surface uses.
#[derive(Debug, Clone)]
pub struct App {
    /// Context text being edited
    context: String,
    /// Question being typed
    question: String,
    /// Currently focused panel
    focus: Focus,
    /// Last upload status and its tone
    status: Option<(String, Tone)>,
    answer: RenderedAnswer,
    sources: Vec<SourceSnippet>,
    results_visible: bool,
    upload_busy: bool,
    query_busy: bool,
    /// Pending alert; blocks input until dismissed
    alert: Option<String>,
    /// Scroll offset for the answer panel
    answer_scroll: u16,
    base_url: String,
}

/// Panel focus state for keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Multi-line context editor (Ctrl+U uploads)
    ContextEditor,
    /// Single-line question input (Enter asks)
    QuestionInput,
    /// Answer and sources panel (j/k scroll)
    Results,
}

impl App {
    /// Creates a new App with empty inputs and focus on the question input.
    ///
    /// # Examples
    ///
    /// ```
    /// use minirag::tui::{App, Focus};
    ///
    /// let app = App::new("http://localhost:8000");
    /// assert_eq!(app.focus(), Focus::QuestionInput);
    /// assert!(!app.results_visible());
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            context: String::new(),
            question: String::new(),
            focus: Focus::QuestionInput,
            status: None,
            answer: RenderedAnswer::empty(),
            sources: Vec::new(),
            results_visible: false,
            upload_busy: false,
            query_busy: false,
            alert: None,
            answer_scroll: 0,
            base_url: base_url.into(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status(&self) -> Option<(&str, Tone)> {
        self.status.as_ref().map(|(m, t)| (m.as_str(), *t))
    }

    pub fn answer(&self) -> &RenderedAnswer {
        &self.answer
    }

    pub fn sources(&self) -> &[SourceSnippet] {
        &self.sources
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn pending_alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn answer_scroll(&self) -> u16 {
        self.answer_scroll
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the control for `action` is busy (and therefore disabled).
    pub fn is_busy(&self, action: Action) -> bool {
        match action {
            Action::Upload => self.upload_busy,
            Action::Query => self.query_busy,
        }
    }

    /// Cycles focus: `ContextEditor` -> `QuestionInput` -> `Results` -> `ContextEditor`.
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::ContextEditor => Focus::QuestionInput,
            Focus::QuestionInput => Focus::Results,
            Focus::Results => Focus::ContextEditor,
        };
    }

    /// Cycles focus in reverse order.
    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::ContextEditor => Focus::Results,
            Focus::QuestionInput => Focus::ContextEditor,
            Focus::Results => Focus::QuestionInput,
        };
    }

    /// Types a character into the focused input. Ignored on the results panel.
    pub fn push_char(&mut self, c: char) {
        match self.focus {
            Focus::ContextEditor => self.context.push(c),
            Focus::QuestionInput => self.question.push(c),
            Focus::Results => {}
        }
    }

    /// Deletes the last character of the focused input.
    pub fn pop_char(&mut self) {
        match self.focus {
            Focus::ContextEditor => {
                self.context.pop();
            }
            Focus::QuestionInput => {
                self.question.pop();
            }
            Focus::Results => {}
        }
    }

    /// Appends pasted text to the focused input. The question input stays single-line.
    pub fn paste(&mut self, text: &str) {
        match self.focus {
            Focus::ContextEditor => self.context.push_str(text),
            Focus::QuestionInput => self
                .question
                .extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c })),
            Focus::Results => {}
        }
    }

    pub fn scroll_answer_down(&mut self, amount: u16) {
        self.answer_scroll = self.answer_scroll.saturating_add(amount);
    }

    pub fn scroll_answer_up(&mut self, amount: u16) {
        self.answer_scroll = self.answer_scroll.saturating_sub(amount);
    }

    /// Dismisses the pending alert, if any. Returns whether one was shown.
    pub fn dismiss_alert(&mut self) -> bool {
        self.alert.take().is_some()
    }

    /// Applies an update produced by a worker thread.
    pub fn apply(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::Busy(action, busy) => self.set_busy(action, busy),
            UiUpdate::Status(message, tone) => self.show_status(&message, tone),
            UiUpdate::Answer(answer) => {
                self.answer = answer;
                self.answer_scroll = 0;
            }
            UiUpdate::Sources(sources) => self.sources = sources,
            UiUpdate::ResultsVisible(visible) => self.set_results_visible(visible),
            UiUpdate::Alert(message) => self.alert(&message),
        }
    }
}

impl OutputSink for App {
    fn set_busy(&mut self, action: Action, busy: bool) {
        match action {
            Action::Upload => self.upload_busy = busy,
            Action::Query => self.query_busy = busy,
        }
    }

    fn show_status(&mut self, message: &str, tone: Tone) {
        self.status = Some((message.to_string(), tone));
    }

    fn show_answer(&mut self, answer: &RenderedAnswer) {
        self.answer = answer.clone();
        self.answer_scroll = 0;
    }

    fn show_sources(&mut self, sources: &[SourceSnippet]) {
        self.sources = sources.to_vec();
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.results_visible = visible;
    }

    fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }
}

/// One controller update, sent from a worker thread to the render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    Busy(Action, bool),
    Status(String, Tone),
    Answer(RenderedAnswer),
    Sources(Vec<SourceSnippet>),
    ResultsVisible(bool),
    Alert(String),
}

/// Output sink that forwards every update over a channel.
///
/// Updates sent after the TUI has exited are dropped.
pub struct ChannelSink {
    tx: Sender<UiUpdate>,
}

impl ChannelSink {
    pub fn new(tx: Sender<UiUpdate>) -> Self {
        Self { tx }
    }

    fn send(&self, update: UiUpdate) {
        let _ = self.tx.send(update);
    }
}

impl OutputSink for ChannelSink {
    fn set_busy(&mut self, action: Action, busy: bool) {
        self.send(UiUpdate::Busy(action, busy));
    }

    fn show_status(&mut self, message: &str, tone: Tone) {
        self.send(UiUpdate::Status(message.to_string(), tone));
    }

    fn show_answer(&mut self, answer: &RenderedAnswer) {
        self.send(UiUpdate::Answer(answer.clone()));
    }

    fn show_sources(&mut self, sources: &[SourceSnippet]) {
        self.send(UiUpdate::Sources(sources.to_vec()));
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.send(UiUpdate::ResultsVisible(visible));
    }

    fn alert(&mut self, message: &str) {
        self.send(UiUpdate::Alert(message.to_string()));
    }
}
