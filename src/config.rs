use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{CellState, ThermalEnvironment};
use crate::simulation::{CellSimulator, CyclicProfile, RunSettings, SimulationError};

pub const CONFIG_FILE: &str = "config/cell.toml";
pub const ENV_PREFIX: &str = "CELLSIM__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cell: CellConfig,
    pub thermal: ThermalEnvironment,
    pub run: RunSettings,
    pub profile: CyclicProfile,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CellConfig {
    #[validate(range(exclusive_min = 0.0))]
    pub capacity_ah: f64,
    pub initial_soc: f64,
    /// Starts at ambient when unset
    pub initial_temp_c: Option<f64>,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            capacity_ah: 1.8,
            initial_soc: 1.0,
            initial_temp_c: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Config {
    /// Defaults, then `config/cell.toml`, then `CELLSIM__SECTION__KEY` variables
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let cfg: Config = Self::figment().extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        self.cell.validate()?;
        self.thermal.validate()?;
        self.profile.validate()?;
        self.run.check()
    }

    pub fn initial_temp_c(&self) -> f64 {
        self.cell
            .initial_temp_c
            .unwrap_or(self.thermal.ambient_temp_c)
    }

    pub fn build_simulator(&self) -> Result<CellSimulator, SimulationError> {
        let cell = CellState::try_new(
            self.cell.capacity_ah,
            self.cell.initial_soc,
            self.initial_temp_c(),
        )?;
        CellSimulator::new(cell, self.thermal.clone(), self.run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_match_demo_scenario() {
        let cfg = Config::default();
        assert_eq!(cfg.cell.capacity_ah, 1.8);
        assert_eq!(cfg.initial_temp_c(), -20.0);
        assert_eq!(cfg.run.timestep_s, 12.0);
        assert_eq!(cfg.profile.cycle_period_min, 17.0);
        assert_eq!(cfg.output.format, OutputFormat::Text);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_figment_defaults_round_trip() {
        Jail::expect_with(|_jail| {
            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.cell.initial_temp_c, None);
            assert_eq!(cfg.run.series_cells, 1);
            assert_eq!(cfg.thermal, ThermalEnvironment::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                CONFIG_FILE,
                r#"
                [cell]
                initial_soc = 0.5
                initial_temp_c = -5.0

                [thermal]
                ambient_temp_c = -10.0

                [output]
                format = "json"
                "#,
            )?;
            jail.set_env("CELLSIM__RUN__SERIES_CELLS", "3");
            jail.set_env("CELLSIM__THERMAL__MASS_G", "300.0");

            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.cell.initial_soc, 0.5);
            assert_eq!(cfg.cell.capacity_ah, 1.8);
            assert_eq!(cfg.initial_temp_c(), -5.0);
            assert_eq!(cfg.thermal.ambient_temp_c, -10.0);
            assert_eq!(cfg.thermal.mass_g, 300.0);
            assert_eq!(cfg.run.series_cells, 3);
            assert_eq!(cfg.output.format, OutputFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.cell.capacity_ah = 0.0;
        assert!(cfg.validate().is_err());
        assert!(cfg.build_simulator().is_err());

        let mut cfg = Config::default();
        cfg.run.timestep_s = -1.0;
        assert!(matches!(
            cfg.validate(),
            Err(SimulationError::InvalidTimestep(_))
        ));
    }

    #[test]
    fn test_build_simulator_starts_at_ambient() {
        let cfg = Config::default();
        let sim = cfg.build_simulator().unwrap();
        assert_eq!(sim.cell().temperature_c(), -20.0);
        assert_eq!(sim.cell().soc(), 1.0);
    }
}
