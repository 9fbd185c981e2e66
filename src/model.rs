//! Application state for the interactive interface.
//!
//! This module contains:
//! - The tabs (patient analysis, population data, information)
//! - Input modes
//! - `AppState`: the allele form, the last analysis and status flags
//!
//! Editing any call clears the last analysis; a new one is produced only on
//! request, so a displayed result always belongs to the calls shown.

use crate::allele::{Allele, CallSet, ObservedAlleles, Position};
use crate::resolver::Analysis;

/// The views of the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analysis,
    Population,
    Information,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Analysis, Tab::Population, Tab::Information];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Analysis => "Patient Analysis",
            Tab::Population => "Population Data",
            Tab::Information => "Information",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Application mode for handling different input states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Command input mode (after pressing ':')
    Command(String),
}

/// Returns the neighbouring allele in `. A C G T`, wrapping at either end.
fn cycle_allele(allele: Allele, forward: bool) -> Allele {
    let len = Allele::ALL.len();
    let index = Allele::ALL.iter().position(|&a| a == allele).unwrap_or(0);
    let next = if forward { (index + 1) % len } else { (index + len - 1) % len };
    Allele::ALL[next]
}

/// The complete application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Active tab
    pub tab: Tab,
    /// Calls entered in the form
    pub observed: ObservedAlleles,
    /// Index into `Position::ALL` of the focused selector
    pub selected: usize,
    /// Result of the last "generate" on the current calls
    pub analysis: Option<Analysis>,
    /// Current application mode
    pub mode: AppMode,
    /// Whether the help overlay is shown
    pub show_help: bool,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Status message to display
    pub status_message: Option<String>,
}

impl AppState {
    /// Creates a state with all positions wild type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state pre-filled with `observed`.
    pub fn with_observed(observed: ObservedAlleles) -> Self {
        Self {
            observed,
            ..Self::default()
        }
    }

    /// The focused position.
    pub fn selected_position(&self) -> Position {
        Position::ALL[self.selected]
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn previous_tab(&mut self) {
        self.tab = self.tab.previous();
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Moves focus to the previous position selector.
    pub fn select_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Moves focus to the next position selector.
    pub fn select_down(&mut self) {
        if self.selected + 1 < Position::ALL.len() {
            self.selected += 1;
        }
    }

    /// Steps the focused call through `. A C G T`.
    pub fn cycle_selected(&mut self, forward: bool) {
        let position = self.selected_position();
        let allele = cycle_allele(self.observed.get(position), forward);
        self.set_call(position, allele);
    }

    /// Sets the focused call.
    pub fn set_selected(&mut self, allele: Allele) {
        self.set_call(self.selected_position(), allele);
    }

    fn set_call(&mut self, position: Position, allele: Allele) {
        if self.observed.get(position) != allele {
            self.observed.set(position, allele);
            self.analysis = None;
        }
    }

    /// Resolves the current calls and stores the result.
    pub fn generate(&mut self) {
        let analysis = Analysis::run(self.observed);
        self.status_message = Some(format!("Genotype: {}", analysis.call.label()));
        self.analysis = Some(analysis);
    }

    /// Resets every call to wild type.
    pub fn reset(&mut self) {
        self.observed = ObservedAlleles::new();
        self.analysis = None;
        self.status_message = Some("All positions reset to wild type".to_string());
    }

    pub fn show_help(&mut self) {
        self.show_help = true;
    }

    pub fn dismiss_help(&mut self) {
        self.show_help = false;
    }

    /// Enters command mode.
    pub fn enter_command_mode(&mut self) {
        self.mode = AppMode::Command(String::new());
    }

    /// Handles a character input in command mode.
    pub fn command_input(&mut self, c: char) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.push(c);
        }
    }

    /// Handles backspace in command mode.
    pub fn command_backspace(&mut self) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.pop();
            if cmd.is_empty() {
                self.mode = AppMode::Normal;
            }
        }
    }

    /// Executes the current command.
    ///
    /// Besides `q`, `help` and `reset`, a call list such as `282=T,590=A`
    /// sets those positions and generates a result.
    pub fn execute_command(&mut self) {
        if let AppMode::Command(cmd) = std::mem::take(&mut self.mode) {
            match cmd.trim() {
                "q" | "quit" => self.should_quit = true,
                "h" | "help" => self.show_help(),
                "reset" => self.reset(),
                calls => self.apply_calls(calls),
            }
        }
        self.mode = AppMode::Normal;
    }

    fn apply_calls(&mut self, calls: &str) {
        let mut parsed = Vec::new();
        let mut seen = CallSet::default();
        for call in calls.split(|c: char| c == ',' || c.is_whitespace()).filter(|c| !c.is_empty()) {
            match ObservedAlleles::parse_call(call) {
                Ok(Some((position, allele))) => {
                    if let Err(e) = seen.insert(position, allele) {
                        self.status_message = Some(e.to_string());
                        return;
                    }
                    parsed.push((position, allele));
                }
                Ok(None) => {
                    self.status_message = Some(format!("Not a NAT2 marker position: {}", call));
                    return;
                }
                Err(e) => {
                    self.status_message = Some(e.to_string());
                    return;
                }
            }
        }
        if parsed.is_empty() {
            self.status_message = Some(format!("Unknown command: {}", calls));
            return;
        }
        for (position, allele) in parsed {
            self.set_call(position, allele);
        }
        self.tab = Tab::Analysis;
        self.generate();
    }

    /// Cancels command mode and returns to normal mode.
    pub fn cancel_command(&mut self) {
        self.mode = AppMode::Normal;
    }
}
