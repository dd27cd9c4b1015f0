use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::api::WorkoutBackend;
use crate::dashboard::DashboardEvent;

pub const POLL_PERIOD: Duration = Duration::from_secs(1);

/// Owner of a running live-stats poll task.
///
/// Dropping or cancelling the handle aborts the task. Results already queued
/// are tagged with `generation` and discarded by the controller.
#[derive(Debug)]
pub struct PollHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn cancel(self) {
        // Drop does the abort
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a task fetching live stats every `period`, first tick one period from now.
pub fn spawn(
    backend: Arc<dyn WorkoutBackend>,
    generation: u64,
    period: Duration,
    events: UnboundedSender<DashboardEvent>,
) -> PollHandle {
    let task = tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let outcome = backend.live_stats().await;
            if events
                .send(DashboardEvent::LiveStats {
                    generation,
                    outcome,
                })
                .is_err()
            {
                log::debug!("live stats receiver gone, poller {generation} exiting");
                break;
            }
        }
    });
    PollHandle { generation, task }
}
