//! Interactive session driver.
//!
//! Puts the terminal in raw mode on the alternate screen, then redraws and
//! applies key actions until one of them ends the session. The terminal is
//! restored when the session ends, including on error.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::event::{apply_action, handle_event, poll_event};
use crate::model::AppState;
use crate::ui::render;

const POLL_TIMEOUT: Duration = Duration::from_millis(50);

type Screen = Terminal<CrosstermBackend<Stdout>>;

/// A running interactive session.
pub struct App {
    screen: Screen,
    state: AppState,
}

impl App {
    /// Takes over the terminal.
    pub fn new(state: AppState) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let screen = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { screen, state })
    }

    /// Draws and handles keys until the user quits.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("interactive session started");

        let Self { screen, state } = self;
        loop {
            screen.draw(|frame| render(frame, state))?;

            let Some(event) = poll_event(POLL_TIMEOUT) else {
                continue;
            };
            let action = handle_event(event, state);
            tracing::trace!(?action, "key handled");
            if !apply_action(state, action) {
                break;
            }
        }

        tracing::info!("interactive session ended");
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.screen.backend_mut(), LeaveAlternateScreen);
        let _ = self.screen.show_cursor();
    }
}

/// Runs the interactive interface until the user quits.
pub fn run_app(state: AppState) -> Result<()> {
    App::new(state)?.run()
}
