pub mod cell;
pub mod interpolation;
pub mod parameters;
pub mod tables;
pub mod thermal;

pub use cell::*;
pub use interpolation::*;
pub use parameters::*;
pub use tables::*;
pub use thermal::*;
