//! Terminal User Interface module for minirag.
//!
//! Provides a context editor, a question input and an answer panel using
//! ratatui for rendering and crossterm for terminal management. Requests run
//! on worker threads so the interface keeps redrawing while they are in flight.

use std::io;
use std::panic;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::controller::ClientController;

mod app;
pub mod event;
mod ui;

pub use app::{App, ChannelSink, Focus, UiUpdate};
use event::Command;

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode, bracketed paste and the alternate screen.
///
/// # Errors
///
/// Returns an error if terminal initialization fails.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Must run before exiting, even on error, to avoid leaving the terminal in
/// raw mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic hook. Errors are ignored.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal, then defers to the
/// original hook.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Runs the command produced by a key press on a worker thread.
///
/// Returns `false` when the loop should exit.
fn dispatch(command: Command, controller: &Arc<ClientController>, tx: &Sender<UiUpdate>) -> bool {
    match command {
        Command::Continue => {}
        Command::Quit => return false,
        Command::Upload(text) => {
            let controller = Arc::clone(controller);
            let mut sink = ChannelSink::new(tx.clone());
            thread::spawn(move || controller.submit_context(&text, &mut sink));
        }
        Command::Query(question) => {
            let controller = Arc::clone(controller);
            let mut sink = ChannelSink::new(tx.clone());
            thread::spawn(move || controller.submit_query(&question, &mut sink));
        }
    }
    true
}

/// Applies every update queued by worker threads.
fn drain_updates(app: &mut App, rx: &Receiver<UiUpdate>) {
    for update in rx.try_iter() {
        app.apply(update);
    }
}

/// Runs the main event loop for the TUI.
///
/// Terminal state is always restored, even on error.
///
/// # Errors
///
/// Returns an error if event polling, rendering, or terminal operations fail.
pub fn run_event_loop(app: &mut App, controller: Arc<ClientController>) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, &controller, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

fn run_event_loop_internal(
    app: &mut App,
    controller: &Arc<ClientController>,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let (tx, rx) = mpsc::channel();

    loop {
        drain_updates(app, &rx);

        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        if !crossterm_event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }

        let command = match crossterm_event::read()? {
            Event::Key(key) => event::handle_key_event(app, key),
            Event::Paste(text) => {
                app.paste(&text);
                Command::Continue
            }
            _ => Command::Continue,
        };

        if !dispatch(command, controller, &tx) {
            break;
        }
    }

    Ok(())
}

/// Entry point for the TUI application.
///
/// # Errors
///
/// Returns an error if terminal initialization or the event loop fails.
pub fn run(controller: Arc<ClientController>, base_url: &str) -> Result<()> {
    init_panic_hook();

    let mut app = App::new(base_url);
    tracing::info!(base_url, "starting TUI");
    run_event_loop(&mut app, controller).context("TUI event loop failed")?;

    Ok(())
}
