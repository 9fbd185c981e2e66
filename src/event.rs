//! Keyboard event handling.
//!
//! Key bindings:
//! - `Tab` / `Shift+Tab`: next / previous tab
//! - `1`, `2`, `3`: jump to a tab
//! - `j` / `k` (or arrows): move between positions
//! - `h` / `l` (or arrows): cycle the allele at the focused position
//! - `.`, `a`, `c`, `g`, `t`: set the allele directly
//! - `Enter`: generate recommendations
//! - `r`: reset all positions to wild type
//! - `?`: show help
//! - `:`: enter command mode
//!   - `:q` or `:quit`: quit the application
//!   - `:h` or `:help`: show help
//!   - `:reset`: reset all positions
//!   - `:282=T,590=A`: set calls and generate
//! - `Ctrl+C`: quit

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::allele::Allele;
use crate::model::{AppMode, AppState, Tab};

/// Actions that can be triggered by keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action (key not recognized)
    None,
    /// Quit the application
    Quit,
    NextTab,
    PreviousTab,
    SelectTab(Tab),
    /// Focus the previous position
    SelectUp,
    /// Focus the next position
    SelectDown,
    /// Cycle the focused allele forward
    AlleleNext,
    /// Cycle the focused allele backward
    AllelePrevious,
    /// Set the focused allele
    SetAllele(Allele),
    /// Resolve the current calls
    Generate,
    /// Reset all calls to wild type
    Reset,
    /// Show the help overlay
    ShowHelp,
    /// Dismiss the help overlay
    DismissHelp,
    /// Enter command mode
    EnterCommandMode,
    /// Add character to command buffer
    CommandChar(char),
    /// Execute current command
    ExecuteCommand,
    /// Cancel command mode
    CancelCommand,
    /// Backspace in command mode
    CommandBackspace,
    /// Resize event (terminal resized)
    Resize(u16, u16),
}

/// Polls for keyboard events with a timeout.
///
/// Returns `None` if no event occurred within the timeout.
pub fn poll_event(timeout: Duration) -> Option<Event> {
    if event::poll(timeout).ok()? {
        event::read().ok()
    } else {
        None
    }
}

/// Converts a crossterm event to an Action based on the current state.
pub fn handle_event(event: Event, state: &AppState) -> Action {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key_event(key_event, &state.mode, state.show_help, state.tab)
        }
        Event::Resize(width, height) => Action::Resize(width, height),
        _ => Action::None,
    }
}

/// Handles a key event based on the current application mode.
fn handle_key_event(key: KeyEvent, mode: &AppMode, show_help: bool, tab: Tab) -> Action {
    // Emergency quit works everywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    // If help is shown, any key dismisses it
    if show_help {
        return Action::DismissHelp;
    }

    match mode {
        AppMode::Normal => handle_normal_mode(key, tab),
        AppMode::Command(_) => handle_command_mode(key),
    }
}

/// Handles key events in normal mode.
fn handle_normal_mode(key: KeyEvent, tab: Tab) -> Action {
    match key.code {
        KeyCode::Tab => return Action::NextTab,
        KeyCode::BackTab => return Action::PreviousTab,
        KeyCode::Char('1') => return Action::SelectTab(Tab::Analysis),
        KeyCode::Char('2') => return Action::SelectTab(Tab::Population),
        KeyCode::Char('3') => return Action::SelectTab(Tab::Information),
        KeyCode::Char(':') => return Action::EnterCommandMode,
        KeyCode::Char('?') => return Action::ShowHelp,
        _ => {}
    }

    // The allele form only exists on the analysis tab
    if tab != Tab::Analysis {
        return Action::None;
    }

    match key.code {
        KeyCode::Char('k') | KeyCode::Up => Action::SelectUp,
        KeyCode::Char('j') | KeyCode::Down => Action::SelectDown,
        KeyCode::Char('l') | KeyCode::Right => Action::AlleleNext,
        KeyCode::Char('h') | KeyCode::Left => Action::AllelePrevious,
        KeyCode::Enter => Action::Generate,
        KeyCode::Char('r') => Action::Reset,
        KeyCode::Char(c) => match Allele::from_symbol(c) {
            Ok(allele) => Action::SetAllele(allele),
            Err(_) => Action::None,
        },
        _ => Action::None,
    }
}

/// Handles key events in command mode.
fn handle_command_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ExecuteCommand,
        KeyCode::Esc => Action::CancelCommand,
        KeyCode::Backspace => Action::CommandBackspace,
        KeyCode::Char(c) => Action::CommandChar(c),
        _ => Action::None,
    }
}

/// Applies an action to the application state.
///
/// Returns `true` if the application should continue, `false` if it should quit.
pub fn apply_action(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::None => {}
        Action::Quit => {
            state.should_quit = true;
        }
        Action::NextTab => state.next_tab(),
        Action::PreviousTab => state.previous_tab(),
        Action::SelectTab(tab) => state.select_tab(tab),
        Action::SelectUp => state.select_up(),
        Action::SelectDown => state.select_down(),
        Action::AlleleNext => state.cycle_selected(true),
        Action::AllelePrevious => state.cycle_selected(false),
        Action::SetAllele(allele) => state.set_selected(allele),
        Action::Generate => state.generate(),
        Action::Reset => state.reset(),
        Action::ShowHelp => state.show_help(),
        Action::DismissHelp => state.dismiss_help(),
        Action::EnterCommandMode => state.enter_command_mode(),
        Action::CommandChar(c) => state.command_input(c),
        Action::ExecuteCommand => state.execute_command(),
        Action::CancelCommand => state.cancel_command(),
        Action::CommandBackspace => state.command_backspace(),
        Action::Resize(_, _) => {
            // Layout is recomputed on every draw
        }
    }

    !state.should_quit
}
