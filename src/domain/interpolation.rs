//! # Bilinear Table Interpolation
//!
//! Maps a continuous (temperature, SOC) operating point onto the calibration grid
//! and blends the four surrounding table entries.
//!
//! ## Coordinates
//!
//! A [`GridPoint`] holds a continuous coordinate and its floor index for each axis,
//! both in units of table rows/columns. The fractional part (`coordinate - index`)
//! is the blend weight toward the next row/column.
//!
//! - SOC maps linearly: `soc * (SOC_BUCKETS - 1)`, clamped to the table
//! - Temperature is found by scanning the (non-uniform) bucket list; outside the
//!   calibrated range the fraction is pinned to 0 (flat extrapolation)
//!
//! ## Interpolation Order
//!
//! First along SOC on both bracketing temperature rows, then along temperature.

use super::tables::{
    ParameterTable, BUCKET_TEMPERATURES_C, SOC_BUCKETS, TEMPERATURE_BUCKETS,
};

/// Continuous grid coordinates with their enclosing floor indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    temperature: f64,
    temperature_index: usize,
    soc: f64,
    soc_index: usize,
}

impl GridPoint {
    /// Build a grid point from raw coordinates.
    ///
    /// Indices are clamped to the table so a lookup can never read outside it.
    /// Coordinates are taken as given: an offset outside `[0, 1)` from its index
    /// extrapolates linearly.
    pub fn new(temperature: f64, temperature_index: usize, soc: f64, soc_index: usize) -> Self {
        Self {
            temperature,
            temperature_index: temperature_index.min(TEMPERATURE_BUCKETS - 1),
            soc,
            soc_index: soc_index.min(SOC_BUCKETS - 1),
        }
    }

    /// Resolve a cell's SOC and temperature (°C) into grid coordinates.
    ///
    /// The stored SOC is never modified; only this working copy is clamped.
    /// A NaN temperature lands on the coldest row.
    pub fn locate(soc: f64, temperature_c: f64) -> Self {
        let (soc, soc_index) = soc_coordinate(soc);
        let (temperature, temperature_index) = temperature_coordinate(temperature_c);
        Self {
            temperature,
            temperature_index,
            soc,
            soc_index,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn temperature_index(&self) -> usize {
        self.temperature_index
    }

    pub fn soc(&self) -> f64 {
        self.soc
    }

    pub fn soc_index(&self) -> usize {
        self.soc_index
    }

    /// Blend weight toward the next temperature row
    pub fn temperature_fraction(&self) -> f64 {
        self.temperature - self.temperature_index as f64
    }

    /// Blend weight toward the next SOC column
    pub fn soc_fraction(&self) -> f64 {
        self.soc - self.soc_index as f64
    }
}

fn soc_coordinate(soc: f64) -> (f64, usize) {
    let last = (SOC_BUCKETS - 1) as f64;
    let coordinate = (soc * last).clamp(0.0, last);
    (coordinate, coordinate.floor() as usize)
}

fn temperature_coordinate(temperature_c: f64) -> (f64, usize) {
    // Linear scan: four buckets, not evenly spaced
    let mut index = 0;
    while index + 1 < TEMPERATURE_BUCKETS && BUCKET_TEMPERATURES_C[index + 1] <= temperature_c {
        index += 1;
    }

    if index + 1 < TEMPERATURE_BUCKETS {
        let lower = BUCKET_TEMPERATURES_C[index];
        let upper = BUCKET_TEMPERATURES_C[index + 1];
        // Negative below the first bucket; pinned so the coldest row is held flat
        let fraction = ((temperature_c - lower) / (upper - lower)).max(0.0);
        (index as f64 + fraction, index)
    } else {
        (index as f64, index)
    }
}

fn lerp(from: f64, to: f64, fraction: f64) -> f64 {
    from + (to - from) * fraction
}

impl ParameterTable {
    /// Bilinear interpolation of this table at `point`.
    ///
    /// The next row/column index is clamped at the table edge, so on the last
    /// temperature row (or last SOC column) the blend partner is the row itself.
    pub fn interpolate(&self, point: &GridPoint) -> f64 {
        let ti = point.temperature_index;
        let si = point.soc_index;
        let ti_next = (ti + 1).min(TEMPERATURE_BUCKETS - 1);
        let si_next = (si + 1).min(SOC_BUCKETS - 1);

        let soc_fraction = point.soc_fraction();
        let lower_row = lerp(self.value(ti, si), self.value(ti, si_next), soc_fraction);
        let upper_row = lerp(self.value(ti_next, si), self.value(ti_next, si_next), soc_fraction);

        lerp(lower_row, upper_row, point.temperature_fraction())
    }
}
