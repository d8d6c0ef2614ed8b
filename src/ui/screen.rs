use ratatui::Frame;

use crate::{App, AppState};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Puzzle screen - the grid, found words and hints
pub struct PuzzleScreen;

impl Screen for PuzzleScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// History screen - solve times from the history database
pub struct HistoryScreen;

impl Screen for HistoryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(&app.history_view, f.area());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Playing => Box::new(PuzzleScreen),
        AppState::History => Box::new(HistoryScreen),
    }
}
