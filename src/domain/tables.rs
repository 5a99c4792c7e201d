//! # Calibration Tables
//!
//! Equivalent-circuit parameters measured on a small LiPo cell, tabulated by
//! cell temperature and state of charge.
//!
//! ## Layout
//!
//! Every table is `[TEMPERATURE_BUCKETS][SOC_BUCKETS]`:
//!
//! - Rows follow [`BUCKET_TEMPERATURES_C`] (ascending, not evenly spaced)
//! - Columns are SOC = 0.0, 0.1, ..., 1.0
//!
//! The tables are `static` and never mutated, so any number of cells (or threads)
//! can read them concurrently.

use serde::Serialize;
use strum::{Display, EnumIter};

/// Number of SOC columns: 0.0, 0.1, ... 1.0
pub const SOC_BUCKETS: usize = 11;

/// Number of calibrated temperature rows
pub const TEMPERATURE_BUCKETS: usize = 4;

/// Calibration temperatures (°C) for each table row
pub const BUCKET_TEMPERATURES_C: [f64; TEMPERATURE_BUCKETS] = [-20.0, -10.0, -5.0, 2.0];

/// One circuit parameter tabulated over temperature × SOC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterTable {
    values: [[f64; SOC_BUCKETS]; TEMPERATURE_BUCKETS],
}

impl ParameterTable {
    pub const fn new(values: [[f64; SOC_BUCKETS]; TEMPERATURE_BUCKETS]) -> Self {
        Self { values }
    }

    /// Stored value at a grid point. Panics on an out-of-range index.
    pub fn value(&self, temperature_index: usize, soc_index: usize) -> f64 {
        self.values[temperature_index][soc_index]
    }

    pub fn rows(&self) -> &[[f64; SOC_BUCKETS]; TEMPERATURE_BUCKETS] {
        &self.values
    }
}

/// Open circuit voltage, Em (volts)
pub static OPEN_CIRCUIT_VOLTAGE: ParameterTable = ParameterTable::new([
    [3.5, 3.65, 3.7, 3.75, 3.78, 3.8, 3.85, 3.9, 3.95, 4.1, 4.2], // -20°C
    [3.5, 3.65, 3.7, 3.746368, 3.794009, 3.824597, 3.870755, 3.921037, 3.984153, 4.1, 4.2], // -10°C
    [3.5, 3.717802, 3.751656, 3.779548, 3.805342, 3.837747, 3.886275, 3.92452, 4.019383, 4.131402, 4.2], // -5°C
    [3.5, 3.723299, 3.754516, 3.788628, 3.812054, 3.840599, 3.888213, 3.933897, 4.024288, 4.130746, 4.182739], // 2°C
]);

/// Series output resistance, R0 (ohms)
pub static SERIES_RESISTANCE: ParameterTable = ParameterTable::new([
    [0.26, 0.26, 0.26, 0.13, 0.13, 0.13, 0.13, 0.13, 0.25, 0.2, 0.67],
    [0.3, 0.050589, 0.144401, 0.085073, 0.091675, 0.085872, 0.08382, 0.084737, 0.075961, 0.15, 0.25],
    [0.2, 0.029142, 0.029737, 0.031219, 0.031587, 0.030885, 0.031477, 0.030845, 0.030875, 0.025, 0.016],
    [0.032564, 0.022225, 0.019854, 0.024638, 0.022878, 0.021342, 0.022003, 0.02195, 0.021421, 0.023454, 0.014168],
]);

/// Short term deep draw resistance, R1 (ohms)
pub static BRANCH_RESISTANCE: ParameterTable = ParameterTable::new([
    [2.0, 0.75, 0.21, 0.190953, 0.147748, 0.127334, 0.143009, 0.180778, 0.1, 0.261743, 0.85],
    [0.003815, 0.007988, 0.020238, 0.015108, 0.01404, 0.014878, 0.014838, 0.014781, 0.015083, 0.15, 0.3],
    [0.011421, 0.003253, 0.012514, 0.00939, 0.010378, 0.009284, 0.008821, 0.008391, 0.010644, 0.008414, 0.007233],
    [0.025991, 0.003294, 0.013872, 0.013772, 0.013957, 0.011306, 0.01088, 0.01135, 0.015937, 0.012274, 0.007585],
]);

/// Short term capacitance, C1 (farads)
pub static BRANCH_CAPACITANCE: ParameterTable = ParameterTable::new([
    [400.0, 500.0, 600.0, 846.0, 846.0, 846.0, 846.0, 846.0, 600.0, 846.0, 596.0],
    [14.34898, 28719.38, 1818.858, 5832.355, 8962.667, 8772.705, 8750.688, 8565.881, 7004.807, 11188.4, 7370.326],
    [0.881527, 33414.97, 2179.029, 11289.18, 7234.158, 6226.428, 5750.18, 9030.291, 3869.932, 11851.0, 7122.03],
    [0.262732, 50759.86, 3022.06, 15720.72, 8308.124, 7180.572, 6619.685, 13150.94, 4201.662, 15103.12, 6852.036],
]);

/// The four tabulated circuit parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Em
    OpenCircuitVoltage,
    /// R0
    SeriesResistance,
    /// R1
    BranchResistance,
    /// C1
    BranchCapacitance,
}

impl ParameterKind {
    pub fn table(self) -> &'static ParameterTable {
        match self {
            ParameterKind::OpenCircuitVoltage => &OPEN_CIRCUIT_VOLTAGE,
            ParameterKind::SeriesResistance => &SERIES_RESISTANCE,
            ParameterKind::BranchResistance => &BRANCH_RESISTANCE,
            ParameterKind::BranchCapacitance => &BRANCH_CAPACITANCE,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ParameterKind::OpenCircuitVoltage => "V",
            ParameterKind::SeriesResistance | ParameterKind::BranchResistance => "ohm",
            ParameterKind::BranchCapacitance => "F",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_temperatures_ascending() {
        assert!(BUCKET_TEMPERATURES_C.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_no_zero_resistance_or_capacitance() {
        // The electrical update divides by R1 and C1
        for kind in [ParameterKind::BranchResistance, ParameterKind::BranchCapacitance] {
            for row in kind.table().rows() {
                assert!(row.iter().all(|v| *v > 0.0), "{kind} has a non-positive entry");
            }
        }
    }

    #[test]
    fn test_kind_display_and_lookup() {
        assert_eq!(ParameterKind::OpenCircuitVoltage.to_string(), "open_circuit_voltage");
        assert_eq!(ParameterKind::iter().count(), 4);
        assert_eq!(ParameterKind::SeriesResistance.table().value(0, 10), 0.67);
        assert_eq!(ParameterKind::BranchCapacitance.unit(), "F");
    }

    #[test]
    fn test_full_charge_voltage() {
        assert_eq!(OPEN_CIRCUIT_VOLTAGE.value(0, SOC_BUCKETS - 1), 4.2);
        assert_eq!(OPEN_CIRCUIT_VOLTAGE.value(3, SOC_BUCKETS - 1), 4.182739);
    }
}
