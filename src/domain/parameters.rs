use serde::{Deserialize, Serialize};

use super::interpolation::GridPoint;
use super::tables::{
    ParameterKind, BRANCH_CAPACITANCE, BRANCH_RESISTANCE, OPEN_CIRCUIT_VOLTAGE, SERIES_RESISTANCE,
};

/// Equivalent-circuit parameters resolved for one (SOC, temperature) operating point.
///
/// Only valid for the state it was computed from; recompute after every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellParameters {
    /// Em: idealized open circuit voltage (V)
    pub open_circuit_v: f64,
    /// R0: series output resistance (Ω)
    pub series_resistance_ohm: f64,
    /// R1: short term branch resistance (Ω)
    pub branch_resistance_ohm: f64,
    /// C1: short term branch capacitance (F)
    pub branch_capacitance_f: f64,
}

impl CellParameters {
    /// Look up all four tables at the given SOC and cell temperature (°C)
    pub fn resolve(soc: f64, temperature_c: f64) -> Self {
        Self::at(&GridPoint::locate(soc, temperature_c))
    }

    /// Interpolate all four tables at an already located grid point
    pub fn at(point: &GridPoint) -> Self {
        Self {
            open_circuit_v: OPEN_CIRCUIT_VOLTAGE.interpolate(point),
            series_resistance_ohm: SERIES_RESISTANCE.interpolate(point),
            branch_resistance_ohm: BRANCH_RESISTANCE.interpolate(point),
            branch_capacitance_f: BRANCH_CAPACITANCE.interpolate(point),
        }
    }

    pub fn get(&self, kind: ParameterKind) -> f64 {
        match kind {
            ParameterKind::OpenCircuitVoltage => self.open_circuit_v,
            ParameterKind::SeriesResistance => self.series_resistance_ohm,
            ParameterKind::BranchResistance => self.branch_resistance_ohm,
            ParameterKind::BranchCapacitance => self.branch_capacitance_f,
        }
    }

    /// RC time constant of the short term branch (s)
    pub fn branch_time_constant_s(&self) -> f64 {
        self.branch_resistance_ohm * self.branch_capacitance_f
    }
}
