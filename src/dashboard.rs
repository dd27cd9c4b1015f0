//! The controller behind the dashboard.
//!
//! User actions spawn backend calls; their completions, the poll ticks and all
//! delayed UI updates come back as [`DashboardEvent`]s on one channel and are
//! applied by [`Dashboard::handle`]. Only the task owning the dashboard mutates
//! it, so every handler runs to completion before the next event is seen.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::api::{
    AnalysisReport, ApiError, FailureText, HistoryEntry, LiveStats, SelectedVideo, StartReply,
    StopReply, WorkoutBackend,
};
use crate::poller::{self, POLL_PERIOD};
use crate::session::{Session, SessionPhase};
use crate::upload::{self, UPLOAD_FAILURE};
use crate::view::{Notice, NoticeArea, NoticeKind, ViewState, NOTICE_TTL};

/// Delay before a finished session's controls revert
pub const STOP_RESET_DELAY: Duration = Duration::from_secs(1);
/// Delay before a completed upload's progress bar disappears
pub const UPLOAD_PROGRESS_LINGER: Duration = Duration::from_secs(1);

pub const WORKOUT_STARTED: &str = "Workout started! Look for the camera window.";
pub const WORKOUT_COMPLETED: &str = "Workout completed!";
pub const HISTORY_FAILED: &str = "Error loading workout history.";

pub const START_FAILURE: FailureText = FailureText {
    status: "Failed to start camera",
    rejected: "Failed to start workout",
    transport: "Error starting workout. Please try again.",
    status_body: false,
};

pub const STOP_FAILURE: FailureText = FailureText {
    status: "Failed to stop workout",
    rejected: "Failed to stop workout",
    transport: "Error stopping workout. Please try again.",
    status_body: false,
};

#[derive(Debug)]
pub enum DashboardEvent {
    UploadFinished {
        upload: u64,
        outcome: Result<AnalysisReport, ApiError>,
    },
    StartFinished {
        generation: u64,
        outcome: Result<StartReply, ApiError>,
    },
    StopFinished {
        generation: u64,
        outcome: Result<StopReply, ApiError>,
    },
    LiveStats {
        generation: u64,
        outcome: Result<LiveStats, ApiError>,
    },
    HistoryLoaded {
        request: u64,
        outcome: Result<Vec<HistoryEntry>, ApiError>,
    },
    ResetAfterStop {
        generation: u64,
    },
    HideUploadProgress {
        upload: u64,
    },
    HideNotice {
        area: NoticeArea,
        id: u64,
    },
}

pub struct Dashboard {
    backend: Arc<dyn WorkoutBackend>,
    events: UnboundedSender<DashboardEvent>,
    session: Session,
    view: ViewState,
    selected_video: Option<SelectedVideo>,
    next_notice: u64,
    upload_seq: u64,
    history_requested: u64,
    history_applied: u64,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn WorkoutBackend>, events: UnboundedSender<DashboardEvent>) -> Self {
        Self {
            backend,
            events,
            session: Session::default(),
            view: ViewState::default(),
            selected_video: None,
            next_notice: 0,
            upload_seq: 0,
            history_requested: 0,
            history_applied: 0,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selected_video(&self) -> Option<&SelectedVideo> {
        self.selected_video.as_ref()
    }

    /// Pick the video to upload; an unreadable path clears the selection
    pub fn select_video(&mut self, path: &Path) -> bool {
        match SelectedVideo::from_path(path) {
            Ok(video) => {
                self.set_selected_video(video);
                true
            }
            Err(err) => {
                log::warn!("cannot select {}: {err}", path.display());
                self.selected_video = None;
                self.view.upload.file_label = upload::NO_FILE_LABEL.to_string();
                self.show_notice(
                    NoticeArea::Upload,
                    format!("Cannot read {}: {err}", path.display()),
                    NoticeKind::Error,
                );
                false
            }
        }
    }

    pub fn set_selected_video(&mut self, video: SelectedVideo) {
        self.view.upload.file_label = video.file_name.clone();
        self.selected_video = Some(video);
    }

    pub fn submit_video(&mut self) {
        let video = match upload::validate(self.selected_video.as_ref()) {
            Ok(video) => video.clone(),
            Err(err) => {
                log::info!("upload rejected locally: {err}");
                self.show_notice(NoticeArea::Upload, err.to_string(), NoticeKind::Error);
                return;
            }
        };

        self.upload_seq += 1;
        let upload = self.upload_seq;
        self.view.upload.progress_visible = true;
        self.view.upload.progress = 0;

        log::info!("uploading {} ({} bytes)", video.file_name, video.size);
        let backend = self.backend.clone();
        self.spawn_call(async move {
            let outcome = backend.analyze(video).await;
            DashboardEvent::UploadFinished { upload, outcome }
        });
    }

    pub fn start_workout(&mut self) {
        let Some(generation) = self.session.begin_start() else {
            log::debug!("start ignored while {}", self.session.phase());
            return;
        };

        log::info!("starting workout session {generation}");
        self.view.live.show_progress(0);
        let backend = self.backend.clone();
        self.spawn_call(async move {
            let outcome = backend.start_camera().await;
            DashboardEvent::StartFinished {
                generation,
                outcome,
            }
        });
    }

    pub fn stop_workout(&mut self) {
        let Some(generation) = self.session.begin_stop() else {
            log::debug!("stop ignored while {}", self.session.phase());
            return;
        };

        log::info!("stopping workout session {generation}");
        let backend = self.backend.clone();
        self.spawn_call(async move {
            let outcome = backend.stop_workout().await;
            DashboardEvent::StopFinished {
                generation,
                outcome,
            }
        });
    }

    /// Re-fetch the full history; the newest request wins
    pub fn refresh_history(&mut self) {
        self.history_requested += 1;
        let request = self.history_requested;
        let backend = self.backend.clone();
        self.spawn_call(async move {
            let outcome = backend.history().await;
            DashboardEvent::HistoryLoaded { request, outcome }
        });
    }

    pub fn handle(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::UploadFinished { upload, outcome } => {
                self.on_upload_finished(upload, outcome)
            }
            DashboardEvent::StartFinished {
                generation,
                outcome,
            } => self.on_start_finished(generation, outcome),
            DashboardEvent::StopFinished {
                generation,
                outcome,
            } => self.on_stop_finished(generation, outcome),
            DashboardEvent::LiveStats {
                generation,
                outcome,
            } => self.on_live_stats(generation, outcome),
            DashboardEvent::HistoryLoaded { request, outcome } => {
                self.on_history_loaded(request, outcome)
            }
            DashboardEvent::ResetAfterStop { generation } => {
                if self.session.is_current(generation, SessionPhase::Stopping) {
                    self.reset_workout();
                }
            }
            DashboardEvent::HideUploadProgress { upload } => {
                if upload == self.upload_seq {
                    self.view.upload.progress_visible = false;
                }
            }
            DashboardEvent::HideNotice { area, id } => {
                self.view.expire_notice(area, id);
            }
        }
    }

    fn on_upload_finished(&mut self, upload: u64, outcome: Result<AnalysisReport, ApiError>) {
        let latest = upload == self.upload_seq;
        match outcome {
            Ok(report) => {
                log::info!("analysis finished: {} reps", report.reps);
                if latest {
                    self.view.upload.progress = 100;
                    self.schedule(
                        UPLOAD_PROGRESS_LINGER,
                        DashboardEvent::HideUploadProgress { upload },
                    );
                }
                self.show_notice(NoticeArea::Upload, report.message, NoticeKind::Success);
                self.refresh_history();
            }
            Err(err) => {
                log::error!("upload error: {err}");
                if latest {
                    self.view.upload.progress_visible = false;
                }
                self.show_notice(
                    NoticeArea::Upload,
                    err.describe(&UPLOAD_FAILURE),
                    NoticeKind::Error,
                );
            }
        }
    }

    fn on_start_finished(&mut self, generation: u64, outcome: Result<StartReply, ApiError>) {
        if !self.session.is_current(generation, SessionPhase::Starting) {
            log::debug!("dropping start reply for stale session {generation}");
            return;
        }

        match outcome {
            Ok(_) => {
                let handle = poller::spawn(
                    self.backend.clone(),
                    generation,
                    POLL_PERIOD,
                    self.events.clone(),
                );
                self.session.begin_recording(handle);
                self.view.live.show_recording();
                self.show_notice(
                    NoticeArea::Live,
                    WORKOUT_STARTED.to_string(),
                    NoticeKind::Success,
                );
            }
            Err(err) => {
                log::error!("start error: {err}");
                self.show_notice(
                    NoticeArea::Live,
                    err.describe(&START_FAILURE),
                    NoticeKind::Error,
                );
                self.reset_workout();
            }
        }
    }

    fn on_stop_finished(&mut self, generation: u64, outcome: Result<StopReply, ApiError>) {
        if !self.session.is_current(generation, SessionPhase::Stopping) {
            log::debug!("dropping stop reply for stale session {generation}");
            return;
        }

        match outcome {
            Ok(reply) => {
                log::info!(
                    "workout {generation} stopped: {} ({} reps)",
                    reply.status.as_deref().unwrap_or("unknown"),
                    reply.reps
                );
                self.view.live.show_progress(100);
                let message = reply
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| WORKOUT_COMPLETED.to_string());
                self.show_notice(NoticeArea::Live, message, NoticeKind::Success);
                self.refresh_history();
            }
            Err(err) => {
                log::error!("stop error: {err}");
                self.show_notice(
                    NoticeArea::Live,
                    err.describe(&STOP_FAILURE),
                    NoticeKind::Error,
                );
            }
        }
        self.schedule(STOP_RESET_DELAY, DashboardEvent::ResetAfterStop { generation });
    }

    fn on_live_stats(&mut self, generation: u64, outcome: Result<LiveStats, ApiError>) {
        if !self.session.is_current(generation, SessionPhase::Recording) {
            return;
        }
        match outcome {
            Ok(stats) => self.view.live.apply_stats(&stats),
            Err(err) => log::warn!("live stats polling error: {err}"),
        }
    }

    fn on_history_loaded(&mut self, request: u64, outcome: Result<Vec<HistoryEntry>, ApiError>) {
        if request < self.history_applied {
            log::debug!("dropping out-of-order history reply {request}");
            return;
        }
        match outcome {
            Ok(entries) => {
                self.history_applied = request;
                log::debug!("history loaded: {} entries", entries.len());
                self.view.history.replace(entries);
            }
            Err(err) => {
                log::error!("history loading error: {err}");
                self.show_notice(
                    NoticeArea::Live,
                    HISTORY_FAILED.to_string(),
                    NoticeKind::Error,
                );
            }
        }
    }

    fn reset_workout(&mut self) {
        self.session.reset();
        self.view.live.reset();
    }

    fn show_notice(&mut self, area: NoticeArea, text: String, kind: NoticeKind) {
        self.next_notice += 1;
        let id = self.next_notice;
        self.view.set_notice(area, Notice { id, text, kind });
        self.schedule(NOTICE_TTL, DashboardEvent::HideNotice { area, id });
    }

    fn schedule(&self, delay: Duration, event: DashboardEvent) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
    }

    fn spawn_call<F>(&self, call: F)
    where
        F: std::future::Future<Output = DashboardEvent> + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = call.await;
            if events.send(event).is_err() {
                log::debug!("dashboard gone before backend reply arrived");
            }
        });
    }
}
