use ratatui::Frame;

use crate::{
    app::{App, AppState},
    ui::{detail::render_history_detail, render_dashboard, render_file_prompt},
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Live panel, upload panel and history table
pub struct DashboardScreen;

impl Screen for DashboardScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_dashboard(app, f);
    }
}

/// Dashboard with the file path prompt on top
pub struct ChooseFileScreen;

impl Screen for ChooseFileScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_dashboard(app, f);
        render_file_prompt(app, f);
    }
}

pub struct HistoryDetailScreen;

impl Screen for HistoryDetailScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_history_detail(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Dashboard => Box::new(DashboardScreen),
        AppState::ChooseFile => Box::new(ChooseFileScreen),
        AppState::HistoryDetail => Box::new(HistoryDetailScreen),
    }
}
