//! Study timer driver
//!
//! Wraps the pure [`CountdownTimer`] with a cancellable tick source. Each
//! `start` spawns one [`TickHandle`]; `pause`, `reset` and completion consume
//! it. Ticks carry the generation of the handle that produced them, so a tick
//! already queued when its handle was cancelled is dropped on arrival.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::domain::entities::{CountdownTimer, TickOutcome, TimerControls, TimerPhase};

/// One tick from the handle with the given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub generation: u64,
}

/// Owns the spawned interval task. Dropping the handle stops the task.
#[derive(Debug)]
pub struct TickHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Spawn a task sending one `TickEvent` every `period`, first one after a full period
    pub fn spawn(generation: u64, period: Duration, ticks: mpsc::UnboundedSender<TickEvent>) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(TickEvent { generation }).is_err() {
                    break;
                }
            }
        });
        Self { generation, task }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Countdown timer plus the tick source that drives it
pub struct StudyTimer {
    timer: CountdownTimer,
    period: Duration,
    ticker: Option<TickHandle>,
    generation: u64,
    ticks: mpsc::UnboundedSender<TickEvent>,
}

impl StudyTimer {
    /// Returns the timer and the receiver its ticks arrive on
    pub fn new(duration_secs: u32, period: Duration) -> (Self, mpsc::UnboundedReceiver<TickEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = Self {
            timer: CountdownTimer::new(duration_secs),
            period,
            ticker: None,
            generation: 0,
            ticks: tx,
        };
        (timer, rx)
    }

    /// Begin or resume counting down. Must be called inside a tokio runtime.
    pub fn start(&mut self) -> bool {
        if !self.timer.start() {
            return false;
        }
        self.generation += 1;
        self.ticker = Some(TickHandle::spawn(self.generation, self.period, self.ticks.clone()));
        tracing::info!(time_left = self.timer.time_left(), "timer started");
        true
    }

    pub fn pause(&mut self) -> bool {
        self.cancel_ticker();
        let paused = self.timer.pause();
        if paused {
            tracing::info!(time_left = self.timer.time_left(), "timer paused");
        }
        paused
    }

    pub fn reset(&mut self) {
        self.cancel_ticker();
        self.timer.reset();
        tracing::info!(duration = self.timer.duration(), "timer reset");
    }

    /// Apply one tick. Ticks from a cancelled or replaced handle are ignored.
    pub fn on_tick(&mut self, event: TickEvent) -> TickOutcome {
        let current = self.ticker.as_ref().map(TickHandle::generation);
        if current != Some(event.generation) {
            tracing::debug!(generation = event.generation, "stale tick dropped");
            return TickOutcome::Ignored;
        }

        let outcome = self.timer.tick();
        if outcome == TickOutcome::Completed {
            self.cancel_ticker();
            tracing::info!(duration = self.timer.duration(), "timer completed");
        }
        outcome
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.cancel();
        }
    }

    pub fn has_tick_source(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn phase(&self) -> TimerPhase {
        self.timer.phase()
    }

    pub fn time_left(&self) -> u32 {
        self.timer.time_left()
    }

    pub fn duration(&self) -> u32 {
        self.timer.duration()
    }

    pub fn display(&self) -> String {
        self.timer.display()
    }

    pub fn controls(&self) -> TimerControls {
        self.timer.controls()
    }

    /// e.g. `24:59 (running) [pause] [reset]`
    pub fn status_line(&self) -> String {
        let controls = self.controls();
        let mut line = format!("{} ({})", self.display(), self.phase().as_str());
        for (enabled, label) in [(controls.start, "start"), (controls.pause, "pause"), (controls.reset, "reset")] {
            if enabled {
                line.push_str(&format!(" [{}]", label));
            }
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn test_ticks_count_down_to_completion() {
        let (mut timer, mut ticks) = StudyTimer::new(3, SECOND);
        assert!(timer.start());

        let mut outcomes = Vec::new();
        while let Some(event) = ticks.recv().await {
            let outcome = timer.on_tick(event);
            outcomes.push(outcome);
            if outcome == TickOutcome::Completed {
                break;
            }
        }

        assert_eq!(
            outcomes,
            vec![TickOutcome::Remaining(2), TickOutcome::Remaining(1), TickOutcome::Completed]
        );
        assert_eq!(timer.phase(), TimerPhase::Completed);
        assert_eq!(timer.time_left(), 0);
        assert!(!timer.has_tick_source());
        assert!(!timer.start());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_keeps_single_source() {
        let (mut timer, mut ticks) = StudyTimer::new(60, SECOND);
        assert!(timer.start());
        assert!(!timer.start());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let first = ticks.recv().await.unwrap();
        assert_eq!(first.generation, 1);
        assert!(ticks.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_then_start_resumes() {
        let (mut timer, mut ticks) = StudyTimer::new(1500, SECOND);
        timer.start();
        for _ in 0..5 {
            let event = ticks.recv().await.unwrap();
            timer.on_tick(event);
        }
        assert!(timer.pause());
        assert_eq!(timer.time_left(), 1495);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(timer.time_left(), 1495);

        assert!(timer.start());
        let event = loop {
            let event = ticks.recv().await.unwrap();
            if event.generation == 2 {
                break event;
            }
        };
        assert_eq!(timer.on_tick(event), TickOutcome::Remaining(1494));
    }

    #[tokio::test]
    async fn test_stale_tick_is_ignored() {
        let (mut timer, _ticks) = StudyTimer::new(10, SECOND);
        timer.start();
        timer.reset();
        assert_eq!(timer.on_tick(TickEvent { generation: 1 }), TickOutcome::Ignored);

        timer.start();
        assert_eq!(timer.on_tick(TickEvent { generation: 1 }), TickOutcome::Ignored);
        assert_eq!(timer.on_tick(TickEvent { generation: 2 }), TickOutcome::Remaining(9));
    }

    #[tokio::test]
    async fn test_status_line() {
        let (mut timer, _ticks) = StudyTimer::new(125, SECOND);
        assert_eq!(timer.status_line(), "02:05 (idle) [start]");
        timer.start();
        assert_eq!(timer.status_line(), "02:05 (running) [pause] [reset]");
        timer.pause();
        assert_eq!(timer.status_line(), "02:05 (paused) [start] [reset]");
    }
}
