//! UI rendering functions for the TUI.
//!
//! Lays out the context editor, upload status, question input and the
//! answer/sources panels using ratatui widgets.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use super::app::{App, Focus};
use crate::controller::{Action, Tone};
use crate::render::{RenderedAnswer, Segment, sanitize_for_terminal};

/// Main rendering function for the TUI.
///
/// Draws the input panels at the top, the results area below them and the
/// shortcut bar at the bottom. A pending alert is drawn as a popup on top.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35), // Context editor
            Constraint::Length(1),      // Upload status
            Constraint::Length(3),      // Question input
            Constraint::Min(0),         // Results
            Constraint::Length(1),      // Shortcut bar
        ])
        .split(size);

    render_context_editor(frame, app, main_chunks[0]);
    render_status_line(frame, app, main_chunks[1]);
    render_question_input(frame, app, main_chunks[2]);
    render_results(frame, app, main_chunks[3]);
    render_shortcut_bar(frame, app, main_chunks[4]);

    if let Some(message) = app.pending_alert() {
        render_alert(frame, message, size);
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn panel_title(label: &str, app: &App, action: Action) -> String {
    if app.is_busy(action) {
        format!("{label} [working...]")
    } else {
        label.to_string()
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::Gray,
        Tone::Success => Color::Green,
        Tone::Error => Color::Red,
    }
}

fn render_context_editor(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::ContextEditor;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title("Context", app, Action::Upload))
        .border_style(border_style(is_focused));

    let mut content = app.context().to_string();
    if is_focused {
        content.push('█');
    }

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.status() {
        Some((message, tone)) => Line::from(Span::styled(
            sanitize_for_terminal(message).into_owned(),
            Style::default().fg(tone_color(tone)),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_question_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::QuestionInput;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title("Question", app, Action::Query))
        .border_style(border_style(is_focused));

    let mut content = app.question().to_string();
    if is_focused {
        content.push('█');
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Renders the answer and sources side by side, or an empty panel while
/// results are hidden.
fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus() == Focus::Results;

    if !app.results_visible() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Answer")
            .border_style(border_style(is_focused));
        frame.render_widget(block, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let answer_block = Block::default()
        .borders(Borders::ALL)
        .title("Answer")
        .border_style(border_style(is_focused));
    let answer = Paragraph::new(answer_text(app.answer()))
        .block(answer_block)
        .wrap(Wrap { trim: false })
        .scroll((app.answer_scroll(), 0));
    frame.render_widget(answer, chunks[0]);

    let items: Vec<ListItem> = app
        .sources()
        .iter()
        .map(|source| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}]", source.position),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(": "),
                Span::raw(sanitize_for_terminal(&source.content).into_owned()),
            ]))
        })
        .collect();
    let sources = List::new(items).block(Block::default().borders(Borders::ALL).title("Sources"));
    frame.render_widget(sources, chunks[1]);
}

/// Converts an answer into styled text, emphasizing citation markers.
fn answer_text(answer: &RenderedAnswer) -> Text<'static> {
    let citation_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();

    for segment in answer.segments() {
        match segment {
            Segment::Citation(marker) => {
                spans.push(Span::styled(marker.to_string(), citation_style));
            }
            Segment::Text(text) => {
                let clean = sanitize_for_terminal(text);
                let mut parts = clean.split('\n');
                if let Some(first) = parts.next()
                    && !first.is_empty()
                {
                    spans.push(Span::raw(first.to_string()));
                }
                for part in parts {
                    lines.push(Line::from(std::mem::take(&mut spans)));
                    if !part.is_empty() {
                        spans.push(Span::raw(part.to_string()));
                    }
                }
            }
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }

    Text::from(lines)
}

fn render_shortcut_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.focus() {
        Focus::ContextEditor => "Ctrl+U: upload | Enter: newline | Tab: next panel | Esc: quit",
        Focus::QuestionInput => "Enter: ask | Ctrl+U: upload | Tab: next panel | Esc: quit",
        Focus::Results => "j/k: scroll | Ctrl+U: upload | Tab: next panel | Esc: quit",
    };

    let line = Line::from(vec![
        Span::styled(shortcuts, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("  {}", app.base_url()),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_alert(frame: &mut Frame, message: &str, area: Rect) {
    let popup = centered_rect(50, 5, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Notice")
        .border_style(Style::default().fg(Color::Yellow));
    let paragraph = Paragraph::new(vec![
        Line::from(sanitize_for_terminal(message).into_owned()),
        Line::from(Span::styled(
            "Press any key",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(block)
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

/// A rectangle `percent_x` wide and `height` rows tall, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::OutputSink;
    use crate::models::SourceSnippet;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn empty_app_shows_panels_and_shortcuts() {
        let app = App::new("http://localhost:8000");
        let screen = screen(&app);
        assert!(screen.contains("Context"));
        assert!(screen.contains("Question"));
        assert!(screen.contains("Enter: ask"));
        assert!(screen.contains("http://localhost:8000"));
        assert!(!screen.contains("Sources"));
    }

    #[test]
    fn visible_results_show_answer_and_sources() {
        let mut app = App::new("");
        app.show_answer(&RenderedAnswer::from_answer("The sky is blue [1]."));
        app.show_sources(&[SourceSnippet::new(1, "sky-doc")]);
        app.set_results_visible(true);

        let screen = screen(&app);
        assert!(screen.contains("The sky is blue [1]."));
        assert!(screen.contains("Sources"));
        assert!(screen.contains("[1]: sky-doc"));
    }

    #[test]
    fn busy_panel_is_marked() {
        let mut app = App::new("");
        app.set_busy(Action::Upload, true);
        assert!(screen(&app).contains("Context [working...]"));
    }

    #[test]
    fn status_and_alert_are_drawn() {
        let mut app = App::new("");
        app.show_status("Upload failed: bad text", Tone::Error);
        assert!(screen(&app).contains("Upload failed: bad text"));

        app.alert("Please enter a question.");
        let screen = screen(&app);
        assert!(screen.contains("Please enter a question."));
        assert!(screen.contains("Notice"));
    }

    #[test]
    fn answer_text_splits_lines_and_styles_citations() {
        let text = answer_text(&RenderedAnswer::from_answer("one [1]\ntwo"));
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[0].spans.len(), 2);
        assert_eq!(text.lines[0].spans[1].content, "[1]");
        assert!(
            text.lines[0].spans[1]
                .style
                .add_modifier
                .contains(Modifier::BOLD)
        );
        assert_eq!(text.lines[1].spans[0].content, "two");
    }

    #[test]
    fn plain_answers_are_not_highlighted() {
        let text = answer_text(&RenderedAnswer::plain("Error getting answer: [1]"));
        assert_eq!(text.lines.len(), 1);
        assert_eq!(text.lines[0].spans.len(), 1);
    }
}
