//! # Cell Thermal Model
//!
//! Lumped thermal mass with Newtonian cooling through the compartment insulation:
//!
//! ΔT = (Q_elec - Q_cool) / (c_p * m)
//!
//! Where:
//! - Q_elec = electrical heat from `CellState::electrical_step` (J)
//! - Q_cool = (T - T_ambient) * A / R * dt (J)
//! - c_p = specific heat (J/(g·°C)), m = mass (g)
//! - R = insulation R-value (m²·°C/W), A = exposed area (m²)
//!
//! The step itself is `CellState::thermal_step`. First-order explicit Euler with no
//! stability guard: keep `dt` well below the time constant `c_p * m * R / A`.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Thermal surroundings of the cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ThermalEnvironment {
    /// Specific heat capacity, J/(g·°C)
    #[validate(range(exclusive_min = 0.0))]
    pub specific_heat_j_per_g_c: f64,

    /// Thermal mass (g)
    #[validate(range(exclusive_min = 0.0))]
    pub mass_g: f64,

    /// Ambient temperature (°C)
    pub ambient_temp_c: f64,

    /// Compartment insulation R-value, m²·°C/W
    #[validate(range(exclusive_min = 0.0))]
    pub insulation_r_value: f64,

    /// Compartment area exposed to ambient (m²)
    #[validate(range(min = 0.0))]
    pub exposed_area_m2: f64,
}

impl Default for ThermalEnvironment {
    fn default() -> Self {
        Self::aluminum_enclosure()
    }
}

impl ThermalEnvironment {
    /// 150 g aluminum pack, still air film, 10 cm × 10 cm face at -20°C
    pub fn aluminum_enclosure() -> Self {
        Self {
            specific_heat_j_per_g_c: 0.9,
            mass_g: 150.0,
            ambient_temp_c: -20.0,
            insulation_r_value: 0.1,
            exposed_area_m2: 0.1 * 0.1,
        }
    }

    pub fn with_ambient(mut self, ambient_temp_c: f64) -> Self {
        self.ambient_temp_c = ambient_temp_c;
        self
    }

    /// Heat needed to raise the cell by one degree (J/°C)
    pub fn heat_capacity_j_per_c(&self) -> f64 {
        self.specific_heat_j_per_g_c * self.mass_g
    }

    /// Heat flow to ambient per degree of difference (W/°C)
    pub fn conductance_w_per_c(&self) -> f64 {
        self.exposed_area_m2 / self.insulation_r_value
    }

    /// Time constant of cooling toward ambient (s)
    pub fn time_constant_s(&self) -> f64 {
        self.heat_capacity_j_per_c() / self.conductance_w_per_c()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellState;

    #[test]
    fn test_default_is_aluminum_enclosure() {
        let env = ThermalEnvironment::default();
        assert_eq!(env.mass_g, 150.0);
        assert!((env.heat_capacity_j_per_c() - 135.0).abs() < 1e-9);
        assert!((env.conductance_w_per_c() - 0.1).abs() < 1e-12);
        assert!((env.time_constant_s() - 1350.0).abs() < 1e-6);
        assert!(env.validate().is_ok());
    }

    #[test]
    fn test_equilibrium_without_heat() {
        let env = ThermalEnvironment::default();
        let mut cell = CellState::new(1.8, 1.0, env.ambient_temp_c);
        for _ in 0..100 {
            cell.thermal_step(0.0, &env, 12.0);
        }
        assert_eq!(cell.temperature_c(), env.ambient_temp_c);
    }

    #[test]
    fn test_heating_raises_temperature() {
        let env = ThermalEnvironment::default();
        let mut cell = CellState::new(1.8, 1.0, env.ambient_temp_c);
        cell.thermal_step(135.0, &env, 12.0);
        // 135 J into 135 J/°C
        assert!((cell.temperature_c() - (env.ambient_temp_c + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_cools_toward_ambient() {
        let env = ThermalEnvironment::default().with_ambient(0.0);
        let mut cell = CellState::new(1.8, 1.0, 10.0);
        let mut previous = cell.temperature_c();
        for _ in 0..50 {
            cell.thermal_step(0.0, &env, 12.0);
            assert!(cell.temperature_c() < previous);
            assert!(cell.temperature_c() > 0.0);
            previous = cell.temperature_c();
        }
    }

    #[test]
    fn test_warms_toward_warmer_ambient() {
        let env = ThermalEnvironment::default().with_ambient(20.0);
        let mut cell = CellState::new(1.8, 1.0, -20.0);
        cell.thermal_step(0.0, &env, 12.0);
        // 40°C * 0.1 W/°C * 12 s / 135 J/°C
        assert!((cell.temperature_c() - (-20.0 + 48.0 / 135.0)).abs() < 1e-9);
    }

    #[test]
    fn test_validation_rejects_zero_mass() {
        let env = ThermalEnvironment {
            mass_g: 0.0,
            ..Default::default()
        };
        assert!(env.validate().is_err());

        let env = ThermalEnvironment {
            insulation_r_value: -1.0,
            ..Default::default()
        };
        assert!(env.validate().is_err());
    }
}
