#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pacing system that rate-limits playback ticks.
//!
//! Adapters feed the elapsed frame time; the system emits at most one
//! [`Action::Tick`] per frame, and only after a full step interval of
//! playback has accumulated.

use std::time::Duration;

use tiny_steps_core::{Action, PlaybackStatus};

/// Step interval used when no configuration is supplied.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration parameters required to construct the pacing system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    step_interval: Duration,
}

impl Config {
    /// Creates a new configuration executing one command per `step_interval`.
    #[must_use]
    pub const fn new(step_interval: Duration) -> Self {
        Self { step_interval }
    }

    /// Simulated time between consecutive ticks.
    #[must_use]
    pub const fn step_interval(&self) -> Duration {
        self.step_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_INTERVAL)
    }
}

/// Pure system that converts frame time into playback ticks.
#[derive(Debug)]
pub struct Pacing {
    step_interval: Duration,
    accumulator: Duration,
}

impl Pacing {
    /// Creates a new pacing system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            step_interval: config.step_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Accumulates `dt` while playing and emits a tick once an interval elapsed.
    ///
    /// Any status other than [`PlaybackStatus::Playing`] discards the
    /// accumulated time, so a fresh playback always waits a full interval
    /// before its first step. A zero interval ticks on every playing frame.
    pub fn handle(&mut self, dt: Duration, status: PlaybackStatus, out: &mut Vec<Action>) {
        if status != PlaybackStatus::Playing {
            self.accumulator = Duration::ZERO;
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        if self.accumulator < self.step_interval {
            return;
        }

        self.accumulator -= self.step_interval;
        if self.accumulator >= self.step_interval {
            self.accumulator = Duration::ZERO;
        }
        out.push(Action::Tick);
    }

    /// Time accumulated toward the next tick.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.accumulator
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
