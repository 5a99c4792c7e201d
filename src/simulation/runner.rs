//! # Fixed-Timestep Runner
//!
//! Drives one [`CellState`] through a load profile and records every step.
//!
//! Each step, in order:
//!
//! 1. Terminal voltage at the applied current (before the state moves)
//! 2. Electrical update, returning the heat dissipated
//! 3. Thermal update with that heat
//!
//! `series_cells` is a plain multiplier on voltage and heat for a stack of
//! identical cells; the state still describes a single cell.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::Validate;

use super::profile::CurrentProfile;
use crate::domain::{CellError, CellState, ThermalEnvironment};

/// Errors raised while setting up a simulation run
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid timestep: {0}s (must be positive and finite)")]
    InvalidTimestep(f64),
    #[error("Invalid duration: {0}s (must be non-negative and finite)")]
    InvalidDuration(f64),
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Cell(#[from] CellError),
}

/// Timing of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct RunSettings {
    /// Integration step (s)
    pub timestep_s: f64,

    /// Total simulated time (s)
    pub duration_s: f64,

    /// Identical cells stacked in series
    #[validate(range(min = 1))]
    pub series_cells: u32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            timestep_s: 12.0,
            duration_s: 30.0 * 60.0,
            series_cells: 1,
        }
    }
}

impl RunSettings {
    pub fn step_count(&self) -> usize {
        (self.duration_s / self.timestep_s).ceil() as usize
    }

    pub fn check(&self) -> Result<(), SimulationError> {
        if !self.timestep_s.is_finite() || self.timestep_s <= 0.0 {
            return Err(SimulationError::InvalidTimestep(self.timestep_s));
        }
        if !self.duration_s.is_finite() || self.duration_s < 0.0 {
            return Err(SimulationError::InvalidDuration(self.duration_s));
        }
        self.validate()?;
        Ok(())
    }
}

/// Snapshot after one timestep
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepRecord {
    /// Start of the step (s)
    pub time_s: f64,
    /// Stack terminal voltage at the applied current, before the step (V)
    pub voltage_v: f64,
    pub current_a: f64,
    /// Cell temperature after the step (°C)
    pub temperature_c: f64,
    /// SOC after the step
    pub soc: f64,
    /// C1 charge after the step (C)
    pub capacitor_charge_c: f64,
    /// Stack heat dissipated during the step (J)
    pub heat_j: f64,
}

impl StepRecord {
    pub fn minutes(&self) -> f64 {
        self.time_s / 60.0
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} minutes: {:.2} V @ {:.2} A ( {:.2} deg C, {:.2} SOC, {:.0} C1Q)",
            self.minutes(),
            self.voltage_v,
            self.current_a,
            self.temperature_c,
            self.soc,
            self.capacitor_charge_c
        )
    }
}

/// Aggregate figures over a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub steps: usize,
    pub min_voltage_v: f64,
    pub max_voltage_v: f64,
    pub peak_temperature_c: f64,
    pub final_temperature_c: f64,
    pub final_soc: f64,
    pub total_heat_j: f64,
}

impl RunSummary {
    /// `None` for an empty run
    pub fn from_records(records: &[StepRecord]) -> Option<Self> {
        let last = records.last()?;
        let mut summary = Self {
            steps: records.len(),
            min_voltage_v: f64::INFINITY,
            max_voltage_v: f64::NEG_INFINITY,
            peak_temperature_c: f64::NEG_INFINITY,
            final_temperature_c: last.temperature_c,
            final_soc: last.soc,
            total_heat_j: 0.0,
        };
        for record in records {
            summary.min_voltage_v = summary.min_voltage_v.min(record.voltage_v);
            summary.max_voltage_v = summary.max_voltage_v.max(record.voltage_v);
            summary.peak_temperature_c = summary.peak_temperature_c.max(record.temperature_c);
            summary.total_heat_j += record.heat_j;
        }
        Some(summary)
    }
}

/// Single-cell simulator
#[derive(Debug, Clone)]
pub struct CellSimulator {
    cell: CellState,
    environment: ThermalEnvironment,
    settings: RunSettings,
    steps_taken: usize,
    soc_warned: bool,
}

impl CellSimulator {
    pub fn new(
        cell: CellState,
        environment: ThermalEnvironment,
        settings: RunSettings,
    ) -> Result<Self, SimulationError> {
        settings.check()?;
        environment.validate()?;
        Ok(Self {
            cell,
            environment,
            settings,
            steps_taken: 0,
            soc_warned: false,
        })
    }

    pub fn cell(&self) -> &CellState {
        &self.cell
    }

    pub fn environment(&self) -> &ThermalEnvironment {
        &self.environment
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Simulated time already covered (s)
    pub fn elapsed_s(&self) -> f64 {
        self.steps_taken as f64 * self.settings.timestep_s
    }

    pub fn set_ambient_temp(&mut self, ambient_temp_c: f64) {
        self.environment.ambient_temp_c = ambient_temp_c;
    }

    /// Advance one timestep at `current_a`
    pub fn step(&mut self, current_a: f64) -> StepRecord {
        let dt_s = self.settings.timestep_s;
        let stack = f64::from(self.settings.series_cells);
        let time_s = self.elapsed_s();

        let voltage_v = stack * self.cell.voltage(current_a);
        let heat_j = stack * self.cell.electrical_step(current_a, dt_s);
        self.cell.thermal_step(heat_j, &self.environment, dt_s);
        self.steps_taken += 1;

        if !self.soc_warned && !self.cell.soc_in_range() {
            self.soc_warned = true;
            warn!(
                time_s,
                soc = self.cell.soc(),
                "state of charge left [0, 1]; model does not clamp"
            );
        }

        let record = StepRecord {
            time_s,
            voltage_v,
            current_a,
            temperature_c: self.cell.temperature_c(),
            soc: self.cell.soc(),
            capacitor_charge_c: self.cell.capacitor_charge_c(),
            heat_j,
        };
        debug!(?record, "step");
        record
    }

    /// Run the configured duration, sampling `profile` at the start of each step
    pub fn run<P>(&mut self, profile: &P) -> Vec<StepRecord>
    where
        P: CurrentProfile + ?Sized,
    {
        let steps = self.settings.step_count();
        info!(
            steps,
            timestep_s = self.settings.timestep_s,
            series_cells = self.settings.series_cells,
            ambient_temp_c = self.environment.ambient_temp_c,
            "starting cell simulation"
        );

        let records: Vec<StepRecord> = (0..steps)
            .map(|_| {
                let current_a = profile.current_at(self.elapsed_s());
                self.step(current_a)
            })
            .collect();

        if let Some(summary) = RunSummary::from_records(&records) {
            info!(
                steps = summary.steps,
                min_voltage_v = summary.min_voltage_v,
                peak_temperature_c = summary.peak_temperature_c,
                final_soc = summary.final_soc,
                total_heat_j = summary.total_heat_j,
                "cell simulation finished"
            );
        }
        records
    }
}
