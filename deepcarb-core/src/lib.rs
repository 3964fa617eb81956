//! Core integrator for a deep-time crust-mantle carbon cycle box model.
//!
//! The model tracks carbon mass and its δ13C composition in six reservoirs
//! (atmosphere-ocean, crustal carbonate, crustal organic carbon, subducted mantle
//! carbonate, subducted mantle organic carbon and primordial mantle carbon) on a
//! 1 Myr step over the whole of Earth history.
//!
//! # Module Organisation
//!
//! - `parameters`: the immutable parameter set and its reference defaults
//! - `schedule`: the piecewise perturbation schedule driving weathering and subduction
//! - `stepper`: the per-step flux, reservoir and isotope update
//! - `model`: the run loop owning every time series
//! - `state`: storage for the reservoir, flux, isotope and diagnostic series
//! - `standard_variables`: names and units of every exposed series

pub mod errors;
pub mod model;
pub mod parameters;
pub mod schedule;
pub mod standard_variables;
pub mod state;
pub mod stepper;
pub mod timeseries;

pub use errors::{CarbonCycleError, CarbonCycleResult};
pub use model::{run_model, CarbonCycleModel, ModelOutput};
pub use parameters::CarbonCycleParameters;
