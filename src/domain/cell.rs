//! # Cell State & Electrical Model
//!
//! Equivalent circuit of one lithium-ion cell:
//!
//! ```text
//!   Em ──┬── R1 ──┬── R0 ── (+) terminal
//!        └── C1 ──┘
//! ```
//!
//! - Em: idealized voltage source tracking SOC and temperature
//! - R1 ‖ C1: short term branch, models transient sag and rebound under load
//! - R0: series ohmic resistance
//!
//! The state advances with explicit Euler steps. Positive current discharges the
//! cell, negative current charges it.

use serde::Serialize;
use thiserror::Error;

use super::parameters::CellParameters;
use super::thermal::ThermalEnvironment;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Cell construction errors
#[derive(Debug, Error, PartialEq)]
pub enum CellError {
    #[error("Invalid capacity: {0} Ah (must be positive and finite)")]
    InvalidCapacity(f64),
    #[error("Initial state of charge is not finite: {0}")]
    NonFiniteSoc(f64),
    #[error("Initial temperature is not finite: {0}°C")]
    NonFiniteTemperature(f64),
}

/// Mutable simulation state of one cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellState {
    /// Fully charged capacity (A·s)
    capacity_as: f64,
    /// State of charge, nominally 0.0 (empty) to 1.0 (full); not clamped
    soc: f64,
    /// Charge (C) borrowed from the short term capacitor C1
    capacitor_charge_c: f64,
    /// Interior cell temperature (°C)
    temperature_c: f64,
}

impl CellState {
    /// Create a cell with C1 at equilibrium.
    ///
    /// `capacity_ah` must be positive; use [`CellState::try_new`] for unchecked input.
    pub fn new(capacity_ah: f64, initial_soc: f64, initial_temp_c: f64) -> Self {
        Self {
            capacity_as: capacity_ah * SECONDS_PER_HOUR,
            soc: initial_soc,
            capacitor_charge_c: 0.0,
            temperature_c: initial_temp_c,
        }
    }

    /// Validating constructor
    pub fn try_new(capacity_ah: f64, initial_soc: f64, initial_temp_c: f64) -> Result<Self, CellError> {
        if !capacity_ah.is_finite() || capacity_ah <= 0.0 {
            return Err(CellError::InvalidCapacity(capacity_ah));
        }
        if !initial_soc.is_finite() {
            return Err(CellError::NonFiniteSoc(initial_soc));
        }
        if !initial_temp_c.is_finite() {
            return Err(CellError::NonFiniteTemperature(initial_temp_c));
        }
        Ok(Self::new(capacity_ah, initial_soc, initial_temp_c))
    }

    pub fn capacity_as(&self) -> f64 {
        self.capacity_as
    }

    pub fn capacity_ah(&self) -> f64 {
        self.capacity_as / SECONDS_PER_HOUR
    }

    pub fn soc(&self) -> f64 {
        self.soc
    }

    pub fn capacitor_charge_c(&self) -> f64 {
        self.capacitor_charge_c
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    /// Whether SOC is still inside its physical range [0, 1]
    pub fn soc_in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.soc)
    }

    /// Circuit parameters at the current SOC and temperature
    pub fn parameters(&self) -> CellParameters {
        CellParameters::resolve(self.soc, self.temperature_c)
    }

    /// Terminal voltage (V) the cell would supply at `current_a` right now.
    ///
    /// Em minus the R1/C1 branch voltage minus the R0 ohmic drop. Does not
    /// touch the state.
    pub fn voltage(&self, current_a: f64) -> f64 {
        let params = self.parameters();
        let r0_drop_v = params.series_resistance_ohm * current_a;
        let branch_v = self.capacitor_charge_c / params.branch_capacitance_f;
        params.open_circuit_v - branch_v - r0_drop_v
    }

    /// Advance the electrical state by `dt_s` seconds at `current_a`.
    ///
    /// Returns the heat (J) dissipated in R0 and R1 over the step. SOC and
    /// capacitor charge are left unclamped; sustained over/under-current can push
    /// SOC outside [0, 1].
    pub fn electrical_step(&mut self, current_a: f64, dt_s: f64) -> f64 {
        let params = self.parameters();

        let r0_drop_v = params.series_resistance_ohm * current_a;

        // R1 and C1 are in parallel and share one voltage
        let branch_v = self.capacitor_charge_c / params.branch_capacitance_f;
        let r1_current_a = branch_v / params.branch_resistance_ohm;
        let c1_current_a = current_a - r1_current_a;

        self.capacitor_charge_c += c1_current_a * dt_s;
        // Full terminal current leaves the cell, not just the R1 share
        self.soc -= current_a * dt_s / self.capacity_as;

        let power_w = r0_drop_v * current_a + branch_v * r1_current_a;
        let heat_j = power_w * dt_s;

        tracing::trace!(
            current_a,
            dt_s,
            branch_v,
            soc = self.soc,
            capacitor_charge_c = self.capacitor_charge_c,
            heat_j,
            "electrical step"
        );

        heat_j
    }

    /// Advance the cell temperature by `dt_s` seconds given `heat_j` of electrical
    /// heating and Newtonian cooling toward the environment's ambient.
    pub fn thermal_step(&mut self, heat_j: f64, env: &ThermalEnvironment, dt_s: f64) {
        let cooling_j = (self.temperature_c - env.ambient_temp_c) * env.exposed_area_m2
            / env.insulation_r_value
            * dt_s;
        self.temperature_c += (heat_j - cooling_j) / (env.specific_heat_j_per_g_c * env.mass_g);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_converts_amp_hours() {
        let cell = CellState::new(1.8, 1.0, -20.0);
        assert!((cell.capacity_as() - 6480.0).abs() < 1e-9);
        assert!((cell.capacity_ah() - 1.8).abs() < 1e-12);
        assert_eq!(cell.capacitor_charge_c(), 0.0);
        assert_eq!(cell.temperature_c(), -20.0);
    }

    #[test]
    fn test_try_new_rejects_bad_input() {
        assert_eq!(CellState::try_new(0.0, 1.0, 0.0), Err(CellError::InvalidCapacity(0.0)));
        assert_eq!(CellState::try_new(-1.0, 1.0, 0.0), Err(CellError::InvalidCapacity(-1.0)));
        assert!(matches!(
            CellState::try_new(1.8, f64::NAN, 0.0),
            Err(CellError::NonFiniteSoc(_))
        ));
        assert!(matches!(
            CellState::try_new(1.8, 0.5, f64::INFINITY),
            Err(CellError::NonFiniteTemperature(_))
        ));
        assert!(CellState::try_new(1.8, 0.5, -10.0).is_ok());
    }

    #[test]
    fn test_open_circuit_voltage_at_rest() {
        let cell = CellState::new(1.8, 1.0, -20.0);
        assert_eq!(cell.voltage(0.0), 4.2);
    }

    #[test]
    fn test_voltage_ohmic_drop() {
        let cell = CellState::new(1.8, 1.0, -20.0);
        // R0 = 0.67 Ω at full charge, -20°C
        assert!((cell.voltage(1.0) - (4.2 - 0.67)).abs() < 1e-12);
        // Charging current raises the terminal voltage
        assert!(cell.voltage(-1.0) > cell.voltage(0.0));
    }

    #[test]
    fn test_first_step_from_equilibrium() {
        let mut cell = CellState::new(1.8, 1.0, -20.0);
        let heat = cell.electrical_step(1.8, 12.0);

        // No branch voltage yet: all heat comes from R0
        let expected_heat = 0.67 * 1.8 * 1.8 * 12.0;
        assert!((heat - expected_heat).abs() < 1e-9);
        // All current flows into C1 on the first step
        assert!((cell.capacitor_charge_c() - 1.8 * 12.0).abs() < 1e-12);
        assert!((cell.soc() - (1.0 - 1.8 * 12.0 / 6480.0)).abs() < 1e-12);
    }

    #[test]
    fn test_branch_voltage_sags_terminal() {
        let mut cell = CellState::new(1.8, 1.0, -20.0);
        let before = cell.voltage(1.8);
        cell.electrical_step(1.8, 12.0);
        assert!(cell.voltage(1.8) < before);
    }

    #[test]
    fn test_soc_not_clamped() {
        let mut cell = CellState::new(0.001, 0.0, -20.0);
        cell.electrical_step(1.0, 60.0);
        assert!(cell.soc() < 0.0);
        assert!(!cell.soc_in_range());

        let mut charging = CellState::new(0.001, 1.0, -20.0);
        charging.electrical_step(-1.0, 60.0);
        assert!(charging.soc() > 1.0);
    }
}
