//! In-memory model of the web page the client renders into.
//!
//! `Page` keeps exactly the state the browser page shows (button states,
//! status line, answer, sources, result panel visibility) and can serialize
//! itself to an HTML fragment. The CLI uses it for `--html` output.

use crate::controller::{Action, OutputSink, Tone};
use crate::models::SourceSnippet;
use crate::render::{RenderedAnswer, escape_html, sources_html};

/// A button with a loading indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Control {
    busy: bool,
}

impl Control {
    /// Whether the loading indicator is shown.
    pub fn is_loading(&self) -> bool {
        self.busy
    }

    /// A busy control is disabled.
    pub fn is_disabled(&self) -> bool {
        self.busy
    }
}

/// Page state driven through [`OutputSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    upload_button: Control,
    query_button: Control,
    status: Option<(String, Tone)>,
    answer_html: String,
    sources_html: String,
    results_hidden: bool,
    alerts: Vec<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// A freshly loaded page: idle buttons, no status, hidden result panel.
    pub fn new() -> Self {
        Self {
            upload_button: Control::default(),
            query_button: Control::default(),
            status: None,
            answer_html: String::new(),
            sources_html: String::new(),
            results_hidden: true,
            alerts: Vec::new(),
        }
    }

    pub fn control(&self, action: Action) -> Control {
        match action {
            Action::Upload => self.upload_button,
            Action::Query => self.query_button,
        }
    }

    /// Status text and its tone, if any has been shown.
    pub fn status(&self) -> Option<(&str, Tone)> {
        self.status.as_ref().map(|(m, t)| (m.as_str(), *t))
    }

    pub fn answer_html(&self) -> &str {
        &self.answer_html
    }

    pub fn sources_html(&self) -> &str {
        &self.sources_html
    }

    pub fn results_visible(&self) -> bool {
        !self.results_hidden
    }

    /// Alerts raised so far, oldest first.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Serializes the page body.
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<section id=\"upload\">\n");
        html.push_str(&button_html("upload-btn", "Upload", self.upload_button));
        match &self.status {
            Some((message, tone)) => html.push_str(&format!(
                "  <p id=\"upload-status\" style=\"color: {}\">{}</p>\n",
                tone.css_color(),
                escape_html(message)
            )),
            None => html.push_str("  <p id=\"upload-status\"></p>\n"),
        }
        html.push_str("</section>\n");

        html.push_str("<section id=\"query\">\n");
        html.push_str(&button_html("query-btn", "Ask", self.query_button));
        html.push_str("</section>\n");

        let class = if self.results_hidden {
            " class=\"hidden\""
        } else {
            ""
        };
        html.push_str(&format!("<section id=\"results-container\"{class}>\n"));
        html.push_str(&format!("  <div id=\"answer\">{}</div>\n", self.answer_html));
        html.push_str(&format!("  <div id=\"sources\">{}</div>\n", self.sources_html));
        html.push_str("</section>\n");

        html
    }
}

fn button_html(id: &str, label: &str, control: Control) -> String {
    if control.is_loading() {
        format!("  <button id=\"{id}\" class=\"loading\" disabled>{label}</button>\n")
    } else {
        format!("  <button id=\"{id}\">{label}</button>\n")
    }
}

impl OutputSink for Page {
    fn set_busy(&mut self, action: Action, busy: bool) {
        match action {
            Action::Upload => self.upload_button.busy = busy,
            Action::Query => self.query_button.busy = busy,
        }
    }

    fn show_status(&mut self, message: &str, tone: Tone) {
        self.status = Some((message.to_string(), tone));
    }

    fn show_answer(&mut self, answer: &RenderedAnswer) {
        self.answer_html = answer.to_html();
    }

    fn show_sources(&mut self, sources: &[SourceSnippet]) {
        self.sources_html = sources_html(sources).unwrap_or_default();
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.results_hidden = !visible;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
