//! Everything the dashboard displays, independent of how it is drawn.

use std::time::Duration;

use crate::api::LiveStats;
use crate::history::HistoryTable;
use crate::upload::NO_FILE_LABEL;

pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Coarse progress for a live session: whole elapsed seconds, capped at 100
pub fn progress_percent(duration_secs: f64) -> u8 {
    if duration_secs.is_nan() || duration_secs <= 0.0 {
        return 0;
    }
    duration_secs.floor().min(100.0) as u8
}

pub fn one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeArea {
    Live,
    Upload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub text: String,
    pub kind: NoticeKind,
}

/// Start/stop controls, session progress and live counters
#[derive(Debug, Clone, PartialEq)]
pub struct LivePanel {
    pub start_visible: bool,
    pub progress_visible: bool,
    pub progress: u8,
    pub stats_visible: bool,
    pub reps: String,
    pub calories: String,
    pub duration: String,
}

impl Default for LivePanel {
    fn default() -> Self {
        Self {
            start_visible: true,
            progress_visible: false,
            progress: 0,
            stats_visible: false,
            reps: "0".to_string(),
            calories: "0.0".to_string(),
            duration: "0.0".to_string(),
        }
    }
}

impl LivePanel {
    pub fn stop_visible(&self) -> bool {
        !self.start_visible
    }

    pub fn show_progress(&mut self, percent: u8) {
        self.progress_visible = true;
        self.progress = percent.min(100);
    }

    pub fn show_recording(&mut self) {
        self.start_visible = false;
        self.stats_visible = true;
    }

    pub fn apply_stats(&mut self, stats: &LiveStats) {
        self.reps = stats.reps.to_string();
        self.calories = one_decimal(stats.calories);
        self.duration = one_decimal(stats.duration);
        self.progress = progress_percent(stats.duration);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadPanel {
    pub file_label: String,
    pub progress_visible: bool,
    pub progress: u8,
}

impl Default for UploadPanel {
    fn default() -> Self {
        Self {
            file_label: NO_FILE_LABEL.to_string(),
            progress_visible: false,
            progress: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub live: LivePanel,
    pub upload: UploadPanel,
    pub live_notice: Option<Notice>,
    pub upload_notice: Option<Notice>,
    pub history: HistoryTable,
}

impl ViewState {
    pub fn notice(&self, area: NoticeArea) -> Option<&Notice> {
        match area {
            NoticeArea::Live => self.live_notice.as_ref(),
            NoticeArea::Upload => self.upload_notice.as_ref(),
        }
    }

    pub fn set_notice(&mut self, area: NoticeArea, notice: Notice) {
        *self.notice_slot(area) = Some(notice);
    }

    /// Hide the notice in `area` if it is still the one identified by `id`
    pub fn expire_notice(&mut self, area: NoticeArea, id: u64) -> bool {
        let slot = self.notice_slot(area);
        if slot.as_ref().is_some_and(|n| n.id == id) {
            *slot = None;
            return true;
        }
        false
    }

    fn notice_slot(&mut self, area: NoticeArea) -> &mut Option<Notice> {
        match area {
            NoticeArea::Live => &mut self.live_notice,
            NoticeArea::Upload => &mut self.upload_notice,
        }
    }
}
