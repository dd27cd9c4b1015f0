use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{self, Interval, MissedTickBehavior};

use crate::dashboard::DashboardEvent;

/// Input from the terminal
#[derive(Clone, Debug)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Resize,
}

/// Unified event type consumed by the app runner
#[derive(Debug)]
pub enum AppEvent {
    Terminal(TerminalEvent),
    Dashboard(DashboardEvent),
    Tick,
}

/// Forward crossterm events from a blocking reader thread
pub fn crossterm_events() -> UnboundedReceiver<TerminalEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || forward_crossterm(tx));
    rx
}

fn forward_crossterm(tx: UnboundedSender<TerminalEvent>) {
    loop {
        let evt = match event::read() {
            Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => TerminalEvent::Key(key),
            Ok(CtEvent::Resize(_, _)) => TerminalEvent::Resize,
            Ok(_) => continue,
            Err(err) => {
                log::error!("terminal event reader stopped: {err}");
                break;
            }
        };
        if tx.send(evt).is_err() {
            break;
        }
    }
}

/// Multiplexes terminal input, dashboard events and a redraw tick
pub struct Runner {
    terminal: UnboundedReceiver<TerminalEvent>,
    dashboard: UnboundedReceiver<DashboardEvent>,
    ticker: Interval,
}

impl Runner {
    pub fn new(
        terminal: UnboundedReceiver<TerminalEvent>,
        dashboard: UnboundedReceiver<DashboardEvent>,
        tick: Duration,
    ) -> Self {
        let mut ticker = time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            terminal,
            dashboard,
            ticker,
        }
    }

    /// Wait for the next event; dashboard events win ties so replies are never starved.
    pub async fn step(&mut self) -> AppEvent {
        tokio::select! {
            biased;
            Some(ev) = self.dashboard.recv() => AppEvent::Dashboard(ev),
            Some(ev) = self.terminal.recv() => AppEvent::Terminal(ev),
            _ = self.ticker.tick() => AppEvent::Tick,
        }
    }
}
