//! Day/night cycle and the clock that drives it
//!
//! Phase transitions are measured in clock seconds, not ticks: the tick
//! counter advances by a fixed increment while the clock is whatever
//! monotonic source the world was built with.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::core::config::{ClockMode, CycleConfig};

/// Day or night segment of the world clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Day,
    Night,
}

impl Phase {
    pub fn is_day(self) -> bool {
        self == Phase::Day
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Day => "DAY",
            Phase::Night => "NIGHT",
        }
    }
}

/// Source of monotonic time in seconds
pub trait Clock {
    fn now(&mut self) -> f64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that advances a fixed step on every reading
#[derive(Debug, Clone)]
pub struct SteppedClock {
    elapsed: f64,
    step: f64,
}

impl SteppedClock {
    pub fn new(step: f64) -> Self {
        Self { elapsed: 0.0, step }
    }
}

impl Clock for SteppedClock {
    fn now(&mut self) -> f64 {
        self.elapsed += self.step;
        self.elapsed
    }
}

/// Build the clock selected by the config
pub fn clock_for(config: &CycleConfig) -> Box<dyn Clock> {
    match config.clock {
        ClockMode::Realtime => Box::new(SystemClock::new()),
        ClockMode::Stepped => Box::new(SteppedClock::new(config.step_seconds)),
    }
}

/// Two-phase clock: a transition occurs once the time spent in the
/// current phase exceeds that phase's duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayNightCycle {
    phase: Phase,
    phase_started: f64,
    day_seconds: f64,
    night_seconds: f64,
}

impl DayNightCycle {
    pub fn new(config: &CycleConfig, start: f64) -> Self {
        Self {
            phase: Phase::Day,
            phase_started: start,
            day_seconds: config.day_seconds,
            night_seconds: config.night_seconds,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_day(&self) -> bool {
        self.phase.is_day()
    }

    /// Seconds spent in the current phase at `now`
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.phase_started
    }

    fn current_duration(&self) -> f64 {
        match self.phase {
            Phase::Day => self.day_seconds,
            Phase::Night => self.night_seconds,
        }
    }

    /// Advance to `now`, returning the new phase if a transition happened
    pub fn advance(&mut self, now: f64) -> Option<Phase> {
        if self.elapsed(now) <= self.current_duration() {
            return None;
        }

        self.phase = match self.phase {
            Phase::Day => Phase::Night,
            Phase::Night => Phase::Day,
        };
        self.phase_started = now;
        Some(self.phase)
    }
}
