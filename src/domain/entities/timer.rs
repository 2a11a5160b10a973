//! Countdown timer state machine
//!
//! Pure state only. Scheduling of the recurring tick lives in
//! `application::services::timer_service`.

/// Default Pomodoro length: 25 minutes
pub const DEFAULT_DURATION_SECS: u32 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerPhase {
    pub fn as_str(&self) -> &str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Completed => "completed",
        }
    }
}

/// Result of feeding one tick into the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running; nothing changed
    Ignored,
    /// Seconds left after this tick
    Remaining(u32),
    /// This tick reached zero
    Completed,
}

/// Which controls are usable in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerControls {
    pub start: bool,
    pub pause: bool,
    pub reset: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    duration: u32,
    time_left: u32,
    phase: TimerPhase,
}

impl CountdownTimer {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            time_left: duration,
            phase: TimerPhase::Idle,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Idle or Paused -> Running. Returns false (and changes nothing) otherwise.
    /// A completed timer must be reset before it can start again.
    pub fn start(&mut self) -> bool {
        match self.phase {
            TimerPhase::Idle | TimerPhase::Paused => {
                self.phase = TimerPhase::Running;
                true
            }
            TimerPhase::Running | TimerPhase::Completed => false,
        }
    }

    /// Running -> Paused, keeping the remaining time
    pub fn pause(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }
        self.phase = TimerPhase::Paused;
        true
    }

    /// Any phase -> Idle with the full duration restored
    pub fn reset(&mut self) {
        self.phase = TimerPhase::Idle;
        self.time_left = self.duration;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != TimerPhase::Running {
            return TickOutcome::Ignored;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.phase = TimerPhase::Completed;
            TickOutcome::Completed
        } else {
            TickOutcome::Remaining(self.time_left)
        }
    }

    pub fn display(&self) -> String {
        format_clock(self.time_left)
    }

    pub fn controls(&self) -> TimerControls {
        match self.phase {
            TimerPhase::Idle => TimerControls { start: true, pause: false, reset: false },
            TimerPhase::Running => TimerControls { start: false, pause: true, reset: true },
            TimerPhase::Paused => TimerControls { start: true, pause: false, reset: true },
            TimerPhase::Completed => TimerControls { start: false, pause: false, reset: true },
        }
    }
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

/// `MM:SS`, both zero-padded; minutes are not wrapped into hours
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
