//! Session countdown clock.
//!
//! The clock only counts. What happens when it reaches zero is decided by the
//! session's `TimeoutPolicy`.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Default per-game budget in seconds.
pub const DEFAULT_BUDGET_SECS: u32 = 300;

/// What the session does when the clock runs out.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// The clock is display state only, play continues at zero.
    #[default]
    Advisory,
    /// Reaching zero concludes the game as a loss for the human.
    HumanForfeits,
}

/// Result of one clock tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Tick {
    /// Clock is not running, nothing changed.
    Idle,
    /// One second was taken, and this many remain.
    Remaining(u32),
    /// The last second was taken. Reported once, after which the clock stops.
    Expired,
}

/// Whole-second countdown for one game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Clock {
    budget_secs: u32,
    remaining_secs: u32,
    running: bool,
}

impl Clock {
    /// A stopped clock holding the full budget.
    pub fn new(budget_secs: u32) -> Self {
        Self {
            budget_secs,
            remaining_secs: budget_secs,
            running: false,
        }
    }

    pub fn budget_secs(&self) -> u32 {
        self.budget_secs
    }
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }
    pub fn is_running(&self) -> bool {
        self.running
    }
    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Start counting down. An expired clock stays stopped.
    pub fn start(&mut self) {
        self.running = !self.is_expired();
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and refill to the full budget.
    pub fn reset(&mut self) {
        self.remaining_secs = self.budget_secs;
        self.running = false;
    }

    /// Take one second if the clock is running.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Remaining(self.remaining_secs)
        }
    }

    /// Remaining time as `M:SS`.
    pub fn formatted(&self) -> String {
        self.to_string()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET_SECS)
    }
}

impl Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}
