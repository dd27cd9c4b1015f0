// Shared fake backend and event pump for the dashboard integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use repwatch::api::{
    AnalysisReport, ApiError, HistoryEntry, LiveStats, SelectedVideo, StartReply, StopReply,
    WorkoutBackend,
};
use repwatch::dashboard::{Dashboard, DashboardEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Scripted outcome of one backend endpoint
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16, Option<&'static str>),
    Rejected(Option<&'static str>),
    Transport,
}

impl<T: Clone> Reply<T> {
    fn result(&self) -> Result<T, ApiError> {
        match self {
            Reply::Ok(v) => Ok(v.clone()),
            Reply::Status(status, message) => Err(ApiError::Status {
                status: *status,
                message: message.map(str::to_string),
            }),
            Reply::Rejected(message) => Err(ApiError::Rejected {
                message: message.map(str::to_string),
            }),
            Reply::Transport => Err(ApiError::Transport("connection refused".into())),
        }
    }
}

#[derive(Debug, Default)]
pub struct Calls {
    pub analyze: AtomicUsize,
    pub start: AtomicUsize,
    pub stop: AtomicUsize,
    pub live: AtomicUsize,
    pub history: AtomicUsize,
}

fn count(c: &AtomicUsize) -> usize {
    c.load(Ordering::SeqCst)
}

impl Calls {
    pub fn analyze(&self) -> usize {
        count(&self.analyze)
    }
    pub fn start(&self) -> usize {
        count(&self.start)
    }
    pub fn stop(&self) -> usize {
        count(&self.stop)
    }
    pub fn live(&self) -> usize {
        count(&self.live)
    }
    pub fn history(&self) -> usize {
        count(&self.history)
    }
    pub fn total(&self) -> usize {
        self.analyze() + self.start() + self.stop() + self.live() + self.history()
    }
}

pub struct FakeBackend {
    pub analyze: Mutex<Reply<AnalysisReport>>,
    pub start: Mutex<Reply<StartReply>>,
    pub stop: Mutex<Reply<StopReply>>,
    pub live: Mutex<Reply<LiveStats>>,
    pub history: Mutex<Reply<Vec<HistoryEntry>>>,
    pub start_delay: Mutex<Duration>,
    pub stop_delay: Mutex<Duration>,
    pub calls: Calls,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            analyze: Mutex::new(Reply::Ok(AnalysisReport {
                message: "Workout completed\nReps: 10".into(),
                reps: 10,
                ..Default::default()
            })),
            start: Mutex::new(Reply::Ok(StartReply {
                message: Some("Live workout started".into()),
            })),
            stop: Mutex::new(Reply::Ok(StopReply {
                message: Some("Workout completed!".into()),
                status: Some("Workout completed".into()),
                ..Default::default()
            })),
            live: Mutex::new(Reply::Ok(LiveStats::default())),
            history: Mutex::new(Reply::Ok(vec![])),
            start_delay: Mutex::new(Duration::ZERO),
            stop_delay: Mutex::new(Duration::ZERO),
            calls: Calls::default(),
        }
    }
}

impl FakeBackend {
    pub fn set_live(&self, stats: LiveStats) {
        *self.live.lock().unwrap() = Reply::Ok(stats);
    }

    pub fn set_history(&self, entries: Vec<HistoryEntry>) {
        *self.history.lock().unwrap() = Reply::Ok(entries);
    }
}

#[async_trait]
impl WorkoutBackend for FakeBackend {
    async fn analyze(&self, _video: SelectedVideo) -> Result<AnalysisReport, ApiError> {
        self.calls.analyze.fetch_add(1, Ordering::SeqCst);
        self.analyze.lock().unwrap().result()
    }

    async fn start_camera(&self) -> Result<StartReply, ApiError> {
        self.calls.start.fetch_add(1, Ordering::SeqCst);
        let delay = *self.start_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        self.start.lock().unwrap().result()
    }

    async fn stop_workout(&self) -> Result<StopReply, ApiError> {
        self.calls.stop.fetch_add(1, Ordering::SeqCst);
        let delay = *self.stop_delay.lock().unwrap();
        tokio::time::sleep(delay).await;
        self.stop.lock().unwrap().result()
    }

    async fn live_stats(&self) -> Result<LiveStats, ApiError> {
        self.calls.live.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().result()
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.calls.history.fetch_add(1, Ordering::SeqCst);
        self.history.lock().unwrap().result()
    }
}

pub fn harness() -> (Arc<FakeBackend>, Dashboard, UnboundedReceiver<DashboardEvent>) {
    let backend = Arc::new(FakeBackend::default());
    let (tx, rx) = mpsc::unbounded_channel();
    let dashboard = Dashboard::new(backend.clone(), tx);
    (backend, dashboard, rx)
}

/// Apply every dashboard event that arrives within `window` of (virtual) time
pub async fn pump_for(
    dashboard: &mut Dashboard,
    rx: &mut UnboundedReceiver<DashboardEvent>,
    window: Duration,
) {
    let deadline = tokio::time::Instant::now() + window;
    loop {
        tokio::select! {
            Some(event) = rx.recv() => dashboard.handle(event),
            _ = tokio::time::sleep_until(deadline) => break,
        }
    }
}

pub fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

pub fn entry(timestamp: &str, reps: u32, calories: f64, duration: f64) -> HistoryEntry {
    HistoryEntry {
        timestamp: timestamp.to_string(),
        reps,
        calories,
        duration,
        summary: None,
    }
}
