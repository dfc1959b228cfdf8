// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, chat events)
// - Rendering the message list and attachment drawers

pub mod app;
pub mod clipboard;
pub mod components;
pub mod drawer;
pub mod markdown;
pub mod scroll;
pub mod traits;

use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::chat::ChatEvent;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop and restores the terminal
/// whether or not the loop failed.
pub async fn run_tui(mut app: App, mut chat_rx: mpsc::Receiver<ChatEvent>) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut chat_rx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on keyboard input, the redraw tick, chat events and finished
/// clipboard writes with `tokio::select!`, redrawing after whichever fires.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    chat_rx: &mut mpsc::Receiver<ChatEvent>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(app.config.tick_rate());
    let mut copy_rx = app
        .take_copy_results()
        .context("Clipboard results already claimed")?;

    loop {
        terminal
            .draw(|f| app.draw(f))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Completes every poll so ticks and chat events stay responsive
            key = next_key() => {
                if let Some(key) = key {
                    app.handle_key(key);
                }
            }

            _ = tick_interval.tick() => {
                app.tick();
            }

            Some(event) = chat_rx.recv() => {
                app.apply(event);
            }

            // Clipboard writes finishing on their own tasks
            Some(outcome) = copy_rx.recv() => {
                app.finish_copy(outcome);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Poll briefly for a key event
async fn next_key() -> Option<KeyEvent> {
    if !event::poll(Duration::from_millis(10)).unwrap_or(false) {
        return None;
    }
    match event::read() {
        Ok(Event::Key(key)) => Some(key),
        _ => None,
    }
}
