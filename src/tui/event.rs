//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes and to the
//! commands the event loop runs on worker threads.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};
use crate::controller::Action;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Keep running.
    Continue,
    Quit,
    /// Upload this context text.
    Upload(String),
    /// Ask this question.
    Query(String),
}

/// Handles a keyboard event and updates the app state accordingly.
///
/// # Event Handling
///
/// - Any key while an alert is shown: dismiss the alert
/// - `Esc` / `Ctrl+C`: quit
/// - `Tab` / `Shift+Tab`: cycle focus
/// - `Ctrl+U`: upload the context (from any panel)
/// - Context editor: typing, `Enter` for newline, `Backspace`
/// - Question input: typing, `Enter` to ask, `Backspace`
/// - Results: `j`/`k` or arrows to scroll the answer
///
/// Submissions are suppressed while the matching action is busy.
///
/// # Examples
///
/// ```
/// use minirag::tui::{App, event::{Command, handle_key_event}};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let mut app = App::new("http://localhost:8000");
/// let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
/// assert_eq!(handle_key_event(&mut app, key), Command::Quit);
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Command {
    if app.dismiss_alert() {
        return Command::Continue;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => return Command::Quit,
        KeyCode::Char('c') if ctrl => return Command::Quit,
        KeyCode::Char('u') if ctrl => return submit(app, Action::Upload),
        KeyCode::Tab => {
            app.next_focus();
            return Command::Continue;
        }
        KeyCode::BackTab => {
            app.prev_focus();
            return Command::Continue;
        }
        _ => {}
    }

    match app.focus() {
        Focus::ContextEditor => handle_context_editor(app, key),
        Focus::QuestionInput => handle_question_input(app, key),
        Focus::Results => handle_results(app, key),
    }
}

/// Builds a submit command unless the action's control is disabled.
fn submit(app: &App, action: Action) -> Command {
    if app.is_busy(action) {
        return Command::Continue;
    }
    match action {
        Action::Upload => Command::Upload(app.context().to_string()),
        Action::Query => Command::Query(app.question().to_string()),
    }
}

fn is_text_input(key: &KeyEvent) -> bool {
    key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT
}

fn handle_context_editor(app: &mut App, key: KeyEvent) -> Command {
    match key.code {
        KeyCode::Char(c) if is_text_input(&key) => app.push_char(c),
        KeyCode::Enter => app.push_char('\n'),
        KeyCode::Backspace => app.pop_char(),
        _ => {}
    }
    Command::Continue
}

fn handle_question_input(app: &mut App, key: KeyEvent) -> Command {
    match key.code {
        KeyCode::Char(c) if is_text_input(&key) => app.push_char(c),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Enter => return submit(app, Action::Query),
        _ => {}
    }
    Command::Continue
}

fn handle_results(app: &mut App, key: KeyEvent) -> Command {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_answer_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_answer_up(1),
        KeyCode::PageDown => app.scroll_answer_down(10),
        KeyCode::PageUp => app.scroll_answer_up(10),
        _ => {}
    }
    Command::Continue
}
