//! Line-oriented terminal output for the CLI.

use std::io::{self, IsTerminal, Write};

use crate::controller::{Action, OutputSink, Tone};
use crate::models::SourceSnippet;
use crate::render::{RenderedAnswer, Segment, sanitize_for_terminal};

// ANSI color codes for terminal output
pub(crate) const GREEN: &str = "\x1b[32m";
pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const YELLOW: &str = "\x1b[33m";
pub(crate) const RESET: &str = "\x1b[0m";
pub(crate) const BOLD: &str = "\x1b[1m";
pub(crate) const DIM: &str = "\x1b[2m";

/// Prints controller updates as they happen.
///
/// The result panel has no terminal equivalent, so visibility changes are
/// ignored; cleared answers and source lists print nothing.
pub struct TerminalSink<W: Write> {
    out: W,
    color: bool,
    error: Option<io::Error>,
}

impl TerminalSink<io::Stdout> {
    /// Writes to stdout, with colors only when stdout is a terminal.
    pub fn stdout() -> Self {
        let color = io::stdout().is_terminal();
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            error: None,
        }
    }

    /// Flushes output and reports the first write error, if any.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.color { code } else { "" }
    }

    fn write_line(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{line}") {
            self.error = Some(e);
        }
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn set_busy(&mut self, action: Action, busy: bool) {
        if busy {
            let line = format!(
                "{}Sending {action} request...{}",
                self.paint(DIM),
                self.paint(RESET)
            );
            self.write_line(&line);
        }
    }

    fn show_status(&mut self, message: &str, tone: Tone) {
        let code = match tone {
            Tone::Neutral => DIM,
            Tone::Success => GREEN,
            Tone::Error => RED,
        };
        let line = format!(
            "{}{}{}",
            self.paint(code),
            sanitize_for_terminal(message),
            self.paint(RESET)
        );
        self.write_line(&line);
    }

    fn show_answer(&mut self, answer: &RenderedAnswer) {
        if answer.is_empty() {
            return;
        }

        let mut line = String::new();
        for segment in answer.segments() {
            match segment {
                Segment::Text(text) => line.push_str(&sanitize_for_terminal(text)),
                Segment::Citation(marker) => {
                    line.push_str(self.paint(BOLD));
                    line.push_str(marker);
                    line.push_str(self.paint(RESET));
                }
            }
        }
        self.write_line(&line);
    }

    fn show_sources(&mut self, sources: &[SourceSnippet]) {
        if sources.is_empty() {
            return;
        }

        self.write_line("");
        let header = format!("{}Sources:{}", self.paint(BOLD), self.paint(RESET));
        self.write_line(&header);
        for source in sources {
            let line = format!(
                "  {}[{}]{}: {}",
                self.paint(BOLD),
                source.position,
                self.paint(RESET),
                sanitize_for_terminal(&source.content)
            );
            self.write_line(&line);
        }
    }

    fn set_results_visible(&mut self, _visible: bool) {}

    fn alert(&mut self, message: &str) {
        let line = format!(
            "{}{}{}",
            self.paint(YELLOW),
            sanitize_for_terminal(message),
            self.paint(RESET)
        );
        self.write_line(&line);
    }
}
