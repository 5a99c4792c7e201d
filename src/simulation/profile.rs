//! # Load Profiles
//!
//! Current draw as a function of simulated time. Positive current discharges the
//! cell, negative current charges it.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Source of the applied current for each timestep
pub trait CurrentProfile {
    /// Applied current (A) at `time_s` seconds into the run
    fn current_at(&self, time_s: f64) -> f64;
}

impl<F> CurrentProfile for F
where
    F: Fn(f64) -> f64,
{
    fn current_at(&self, time_s: f64) -> f64 {
        self(time_s)
    }
}

/// Fixed current for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantProfile {
    pub current_a: f64,
}

impl ConstantProfile {
    pub fn new(current_a: f64) -> Self {
        Self { current_a }
    }
}

impl CurrentProfile for ConstantProfile {
    fn current_at(&self, _time_s: f64) -> f64 {
        self.current_a
    }
}

/// Repeating load window.
///
/// Each cycle of `cycle_period_min` minutes draws `load_current_a` from
/// `lead_in_s` until `lead_in_s + on_duration_min` minutes (both ends inclusive),
/// and nothing otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct CyclicProfile {
    /// Current drawn inside the window (A)
    pub load_current_a: f64,

    /// Length of one cycle (minutes)
    #[validate(range(exclusive_min = 0.0))]
    pub cycle_period_min: f64,

    /// Length of the load window (minutes)
    #[validate(range(min = 0.0))]
    pub on_duration_min: f64,

    /// Idle time at the start of each cycle before the window opens (s)
    #[validate(range(min = 0.0))]
    pub lead_in_s: f64,
}

impl Default for CyclicProfile {
    fn default() -> Self {
        Self {
            load_current_a: 1.8,
            cycle_period_min: 17.0,
            on_duration_min: 5.0,
            lead_in_s: 10.0,
        }
    }
}

impl CyclicProfile {
    /// Position (s) inside the current cycle
    pub fn cycle_position_s(&self, time_s: f64) -> f64 {
        time_s.rem_euclid(self.cycle_period_min * 60.0)
    }

    pub fn is_active(&self, time_s: f64) -> bool {
        let position = self.cycle_position_s(time_s);
        let window_end = self.lead_in_s + self.on_duration_min * 60.0;
        position >= self.lead_in_s && position <= window_end
    }
}

impl CurrentProfile for CyclicProfile {
    fn current_at(&self, time_s: f64) -> f64 {
        if self.is_active(time_s) {
            self.load_current_a
        } else {
            0.0
        }
    }
}
