//! Pomodoro timer state machine and its one-second tick schedule.
//!
//! The engine only moves between modes when `time_left` runs out, and it
//! always stops at a boundary: the next phase needs an explicit `start()`.

use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Work sessions per long break.
pub const SESSIONS_PER_LONG_BREAK: u32 = 4;

/// Interval between engine ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest interval a [`TickSchedule`] accepts.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroMode {
    #[default]
    Work,
    Break,
    LongBreak,
}

impl PomodoroMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "专注中",
            Self::Break => "短休息",
            Self::LongBreak => "长休息",
        }
    }
}

/// Result of one [`PomodoroState::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running; nothing changed.
    Idle,
    /// One second counted down.
    Counted,
    /// A phase finished and the engine stopped in the next one.
    Transitioned { from: PomodoroMode, to: PomodoroMode },
}

/// Duration edits from the settings panel, in minutes. `None` leaves a value
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PomodoroDurations {
    pub work: Option<u32>,
    pub short_break: Option<u32>,
    pub long_break: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PomodoroState {
    pub is_running: bool,
    pub mode: PomodoroMode,
    /// Seconds left in the current phase.
    pub time_left: u32,
    /// Minutes.
    pub work_duration: u32,
    /// Minutes.
    pub break_duration: u32,
    /// Minutes.
    pub long_break_duration: u32,
    pub sessions_completed: u32,
}

impl Default for PomodoroState {
    fn default() -> Self {
        Self {
            is_running: false,
            mode: PomodoroMode::Work,
            time_left: 25 * 60,
            work_duration: 25,
            break_duration: 5,
            long_break_duration: 15,
            sessions_completed: 0,
        }
    }
}

impl PomodoroState {
    /// Configured length of `mode`, in seconds.
    pub fn duration_secs(&self, mode: PomodoroMode) -> u32 {
        let minutes = match mode {
            PomodoroMode::Work => self.work_duration,
            PomodoroMode::Break => self.break_duration,
            PomodoroMode::LongBreak => self.long_break_duration,
        };
        minutes.saturating_mul(60)
    }

    /// Returns false if the timer was already running.
    pub fn start(&mut self) -> bool {
        let was_running = self.is_running;
        self.is_running = true;
        !was_running
    }

    /// Stop counting; `time_left` is kept.
    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Back to a full, stopped work phase. The session count is kept.
    pub fn reset(&mut self) {
        self.is_running = false;
        self.mode = PomodoroMode::Work;
        self.time_left = self.duration_secs(PomodoroMode::Work);
    }

    /// Advance the timer by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }
        if self.time_left > 1 {
            self.time_left -= 1;
            return TickOutcome::Counted;
        }

        let from = self.mode;
        let to = match from {
            PomodoroMode::Work => {
                self.sessions_completed = self.sessions_completed.saturating_add(1);
                if self.sessions_completed % SESSIONS_PER_LONG_BREAK == 0 {
                    PomodoroMode::LongBreak
                } else {
                    PomodoroMode::Break
                }
            }
            PomodoroMode::Break | PomodoroMode::LongBreak => PomodoroMode::Work,
        };
        self.mode = to;
        self.time_left = self.duration_secs(to);
        self.is_running = false;
        TickOutcome::Transitioned { from, to }
    }

    /// Apply duration edits. Durations are at least one minute. Changing the
    /// work duration while stopped in work mode also restarts the countdown
    /// from the new length.
    pub fn set_durations(&mut self, durations: PomodoroDurations) {
        if let Some(work) = durations.work {
            self.work_duration = work.max(1);
            if self.mode == PomodoroMode::Work && !self.is_running {
                self.time_left = self.duration_secs(PomodoroMode::Work);
            }
        }
        if let Some(minutes) = durations.short_break {
            self.break_duration = minutes.max(1);
        }
        if let Some(minutes) = durations.long_break {
            self.long_break_duration = minutes.max(1);
        }
    }

    /// Elapsed fraction of the current phase, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        let total = self.duration_secs(self.mode);
        if total == 0 {
            return 1.0;
        }
        (1.0 - f64::from(self.time_left) / f64::from(total)).clamp(0.0, 1.0)
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.time_left / 60, self.time_left % 60)
    }
}

/// Recurring one-second schedule that exists only while the timer runs.
///
/// The host calls [`TickSchedule::sync`] after every pomodoro action so the
/// schedule is armed on `start()` and torn down the moment the engine stops.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl TickSchedule {
    /// Intervals below [`MIN_TICK_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_TICK_INTERVAL),
            next_due: None,
        }
    }

    /// Arm or disarm to match the engine's running flag.
    pub fn sync(&mut self, running: bool, now: Instant) {
        match (running, self.next_due) {
            (true, None) => self.next_due = Some(now + self.interval),
            (false, Some(_)) => self.next_due = None,
            _ => {}
        }
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of ticks that have come due by `now`; consumes them.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next_due else {
            return 0;
        };
        let mut due: u32 = 0;
        while next <= now {
            due = due.saturating_add(1);
            next += self.interval;
        }
        self.next_due = Some(next);
        due
    }

    /// Time until the next tick, if armed.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due
            .map(|next| next.saturating_duration_since(now))
    }
}
