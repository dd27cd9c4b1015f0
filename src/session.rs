use chrono::{DateTime, Local};

use crate::poller::PollHandle;

/// Lifecycle of the live camera workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionPhase {
    Idle,
    Starting,
    Recording,
    Stopping,
}

/// The single live session owned by the dashboard.
///
/// The poll handle is held only while recording; every transition that leaves
/// `Recording` drops it, which aborts the poll task.
#[derive(Debug)]
pub struct Session {
    phase: SessionPhase,
    generation: u64,
    started_at: Option<DateTime<Local>>,
    poller: Option<PollHandle>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            generation: 0,
            started_at: None,
            poller: None,
        }
    }
}

impl Session {
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn is_recording(&self) -> bool {
        self.phase == SessionPhase::Recording
    }

    pub fn has_poller(&self) -> bool {
        self.poller.is_some()
    }

    /// True when `generation` names the session currently in `phase`
    pub fn is_current(&self, generation: u64, phase: SessionPhase) -> bool {
        self.generation == generation && self.phase == phase
    }

    /// `Idle -> Starting` under a fresh generation.
    ///
    /// Returns `None` in every other phase. While stopping, the backend still
    /// owns the previous capture until its stop reply and the delayed reset land.
    pub fn begin_start(&mut self) -> Option<u64> {
        if self.phase != SessionPhase::Idle {
            return None;
        }
        self.poller = None;
        self.started_at = None;
        self.generation += 1;
        self.phase = SessionPhase::Starting;
        Some(self.generation)
    }

    /// `Starting -> Recording`; the handle must belong to the current generation.
    pub fn begin_recording(&mut self, poller: PollHandle) -> bool {
        if !self.is_current(poller.generation(), SessionPhase::Starting) {
            return false;
        }
        self.started_at = Some(Local::now());
        self.poller = Some(poller);
        self.phase = SessionPhase::Recording;
        true
    }

    /// `Recording -> Stopping`, cancelling the poll task before returning.
    pub fn begin_stop(&mut self) -> Option<u64> {
        if self.phase != SessionPhase::Recording {
            return None;
        }
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
        self.phase = SessionPhase::Stopping;
        Some(self.generation)
    }

    /// Back to `Idle` from any phase. The generation is kept so late replies stay stale.
    pub fn reset(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
        self.started_at = None;
        self.phase = SessionPhase::Idle;
    }
}
