use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::dashboard::Dashboard;

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Dashboard,
    ChooseFile,
    HistoryDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Terminal front end: the dashboard plus which screen is showing
pub struct App {
    pub dashboard: Dashboard,
    pub state: AppState,
    pub path_input: String,
    pub selected_row: usize,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            state: AppState::Dashboard,
            path_input: String::new(),
            selected_row: 0,
        }
    }

    /// Initial loads for a freshly opened dashboard
    pub fn start(&mut self) {
        log::debug!("loading workout history");
        self.dashboard.refresh_history();
    }

    /// Selected history row, clamped to what is currently loaded
    pub fn selected_row(&self) -> Option<usize> {
        let len = self.dashboard.view().history.len();
        (len > 0).then(|| self.selected_row.min(len - 1))
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        match self.state {
            AppState::Dashboard => return self.on_dashboard_key(key),
            AppState::ChooseFile => self.on_choose_file_key(key),
            AppState::HistoryDetail => match key.code {
                KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Esc => {
                    self.state = AppState::Dashboard;
                }
                KeyCode::Up => self.move_selection(-1),
                KeyCode::Down => self.move_selection(1),
                _ => {}
            },
        }
        KeyOutcome::Continue
    }

    fn on_dashboard_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('s') => self.dashboard.start_workout(),
            KeyCode::Char('x') => self.dashboard.stop_workout(),
            KeyCode::Char('u') => self.dashboard.submit_video(),
            KeyCode::Char('r') => self.dashboard.refresh_history(),
            KeyCode::Char('f') => {
                self.path_input = self
                    .dashboard
                    .selected_video()
                    .map(|v| v.path.display().to_string())
                    .unwrap_or_default();
                self.state = AppState::ChooseFile;
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => {
                if self.selected_row().is_some() {
                    self.state = AppState::HistoryDetail;
                }
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn on_choose_file_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state = AppState::Dashboard,
            KeyCode::Enter => {
                let raw = self.path_input.trim();
                if !raw.is_empty() {
                    let path = expand_home(raw);
                    self.dashboard.select_video(&path);
                }
                self.state = AppState::Dashboard;
            }
            KeyCode::Backspace => {
                self.path_input.pop();
            }
            KeyCode::Char(c) => self.path_input.push(c),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let Some(current) = self.selected_row() else {
            self.selected_row = 0;
            return;
        };
        let last = self.dashboard.view().history.len() - 1;
        self.selected_row = current.saturating_add_signed(delta).min(last);
    }
}

fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        AnalysisReport, ApiError, HistoryEntry, LiveStats, SelectedVideo, StartReply, StopReply,
        WorkoutBackend,
    };
    use crate::dashboard::DashboardEvent;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    struct NullBackend;

    #[async_trait]
    impl WorkoutBackend for NullBackend {
        async fn analyze(&self, _video: SelectedVideo) -> Result<AnalysisReport, ApiError> {
            Ok(AnalysisReport::default())
        }
        async fn start_camera(&self) -> Result<StartReply, ApiError> {
            Ok(StartReply::default())
        }
        async fn stop_workout(&self) -> Result<StopReply, ApiError> {
            Ok(StopReply::default())
        }
        async fn live_stats(&self) -> Result<LiveStats, ApiError> {
            Ok(LiveStats::default())
        }
        async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
            Ok(vec![])
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> (App, mpsc::UnboundedReceiver<DashboardEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(Dashboard::new(Arc::new(NullBackend), tx)), rx)
    }

    fn load_history(app: &mut App, n: usize) {
        let entries = (0..n)
            .map(|i| HistoryEntry {
                timestamp: format!("2024-05-0{}T10:00:00", i + 1),
                reps: i as u32,
                ..Default::default()
            })
            .collect();
        app.dashboard.handle(DashboardEvent::HistoryLoaded {
            request: 0,
            outcome: Ok(entries),
        });
    }

    #[tokio::test]
    async fn quit_keys() {
        let (mut app, _rx) = app();
        assert_eq!(app.on_key(key(KeyCode::Char('q'))), KeyOutcome::Quit);
        assert_eq!(app.on_key(key(KeyCode::Esc)), KeyOutcome::Quit);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyOutcome::Quit
        );
    }

    #[tokio::test]
    async fn start_key_enters_starting_phase() {
        let (mut app, _rx) = app();
        app.on_key(key(KeyCode::Char('s')));
        assert_eq!(
            app.dashboard.session().phase(),
            crate::session::SessionPhase::Starting
        );
        assert!(app.dashboard.view().live.progress_visible);
    }

    #[tokio::test]
    async fn choose_file_prompt_selects_video() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pushups.mp4");
        std::fs::write(&path, b"data").unwrap();

        let (mut app, _rx) = app();
        app.on_key(key(KeyCode::Char('f')));
        assert_eq!(app.state, AppState::ChooseFile);

        for c in path.display().to_string().chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
        // 'q' while typing a path is text, not quit
        app.on_key(key(KeyCode::Char('q')));
        app.on_key(key(KeyCode::Backspace));
        app.on_key(key(KeyCode::Enter));

        assert_eq!(app.state, AppState::Dashboard);
        assert_eq!(app.dashboard.view().upload.file_label, "pushups.mp4");
        assert_eq!(app.dashboard.selected_video().map(|v| v.size), Some(4));
    }

    #[tokio::test]
    async fn escape_cancels_file_prompt() {
        let (mut app, _rx) = app();
        app.on_key(key(KeyCode::Char('f')));
        app.on_key(key(KeyCode::Char('x')));
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Dashboard);
        assert!(app.dashboard.selected_video().is_none());
    }

    #[tokio::test]
    async fn selection_is_clamped_to_history() {
        let (mut app, _rx) = app();
        assert_eq!(app.selected_row(), None);
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Dashboard);

        load_history(&mut app, 3);
        app.on_key(key(KeyCode::Up));
        assert_eq!(app.selected_row(), Some(0));
        for _ in 0..5 {
            app.on_key(key(KeyCode::Down));
        }
        assert_eq!(app.selected_row(), Some(2));

        load_history(&mut app, 1);
        assert_eq!(app.selected_row(), Some(0));
    }

    #[tokio::test]
    async fn detail_screen_round_trip() {
        let (mut app, _rx) = app();
        load_history(&mut app, 2);
        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::HistoryDetail);

        app.on_key(key(KeyCode::Up));
        assert_eq!(app.selected_row(), Some(0));
        app.on_key(key(KeyCode::Char('b')));
        assert_eq!(app.state, AppState::Dashboard);
    }

    #[test]
    fn expand_home_only_touches_tilde_prefix() {
        assert_eq!(expand_home("/tmp/a.mp4"), PathBuf::from("/tmp/a.mp4"));
        if let Ok(home) = std::env::var("HOME") {
            assert_eq!(expand_home("~/a.mp4"), PathBuf::from(home).join("a.mp4"));
        }
    }
}
