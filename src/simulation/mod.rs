//! # Simulation Driver
//!
//! Fixed-timestep loop around the cell model.
//!
//! ## Components
//!
//! - **Profile**: current draw over time ([`CurrentProfile`], [`CyclicProfile`], [`ConstantProfile`])
//! - **Runner**: steps a cell through a profile and records voltage, SOC, temperature and C1 charge
//!
//! ## Usage
//!
//! ```rust
//! use lipo_cell_sim::domain::{CellState, ThermalEnvironment};
//! use lipo_cell_sim::simulation::{CellSimulator, CyclicProfile, RunSettings, RunSummary};
//!
//! let env = ThermalEnvironment::aluminum_enclosure();
//! let cell = CellState::new(1.8, 1.0, env.ambient_temp_c);
//! let mut sim = CellSimulator::new(cell, env, RunSettings::default())?;
//!
//! let records = sim.run(&CyclicProfile::default());
//! let summary = RunSummary::from_records(&records);
//! assert!(summary.is_some());
//! # Ok::<(), lipo_cell_sim::simulation::SimulationError>(())
//! ```

pub mod profile;
pub mod runner;

pub use profile::{ConstantProfile, CurrentProfile, CyclicProfile};
pub use runner::{CellSimulator, RunSettings, RunSummary, SimulationError, StepRecord};
