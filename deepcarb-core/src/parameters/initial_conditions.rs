//! Initial conditions
//!
//! Reservoir masses and isotopic compositions at step 0.

use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Reservoir masses and δ13C values at the start of the run.
///
/// The surface and subducted reservoirs start empty; all carbon initially sits
/// in the primordial mantle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    /// Atmosphere-ocean carbon
    /// unit: g
    /// default: 0
    pub atmosphere_ocean: FloatValue,

    /// Crustal carbonate carbon
    /// unit: g
    /// default: 0
    pub crustal_carbonate: FloatValue,

    /// Crustal organic carbon
    /// unit: g
    /// default: 0
    pub crustal_organic: FloatValue,

    /// Subducted carbonate carbon stored in the mantle
    /// unit: g
    /// default: 0
    pub mantle_carbonate: FloatValue,

    /// Subducted organic carbon stored in the mantle
    /// unit: g
    /// default: 0
    pub mantle_organic: FloatValue,

    /// Primordial mantle carbon
    /// unit: g
    /// default: 1e23
    pub primordial_mantle: FloatValue,

    /// δ13C of atmosphere-ocean carbon
    /// unit: ‰
    /// default: -5
    pub d13c_atmosphere_ocean: FloatValue,

    /// δ13C of crustal carbonate
    /// unit: ‰
    /// default: 0
    pub d13c_crustal_carbonate: FloatValue,

    /// δ13C of crustal organic carbon
    /// unit: ‰
    /// default: -25
    pub d13c_crustal_organic: FloatValue,

    /// δ13C of primordial mantle carbon. Held constant for the whole run and
    /// also used for the MOR flux and the step 0 arc and OIB outputs.
    /// unit: ‰
    /// default: -5
    pub d13c_primordial_mantle: FloatValue,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            atmosphere_ocean: 0.0,
            crustal_carbonate: 0.0,
            crustal_organic: 0.0,
            mantle_carbonate: 0.0,
            mantle_organic: 0.0,
            primordial_mantle: 1e23,
            d13c_atmosphere_ocean: -5.0,
            d13c_crustal_carbonate: 0.0,
            d13c_crustal_organic: -25.0,
            d13c_primordial_mantle: -5.0,
        }
    }
}
