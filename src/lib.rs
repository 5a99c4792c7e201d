//! LiPo Cell Simulator - equivalent-circuit electrical and thermal model of a
//! rechargeable lithium-ion cell.
//!
//! The model is a set of calibration tables indexed by temperature and state of
//! charge, a bilinear interpolator over them, and explicit-Euler electrical and
//! thermal updates of a small [`CellState`].

pub mod config;
pub mod domain;
pub mod simulation;
pub mod telemetry;

pub use config::Config;
pub use domain::{CellParameters, CellState, GridPoint, ParameterKind, ThermalEnvironment};
pub use simulation::{CellSimulator, CurrentProfile, CyclicProfile, RunSettings, StepRecord};
