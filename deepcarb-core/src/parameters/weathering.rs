//! Organic carbon weathering and oxygen diagnostic parameters.

use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Molar mass applied when converting the weathering constants to grams.
///
/// The weathering normalisation uses a rounded carbon molar mass, unlike the
/// oxygen diagnostics.
const WEATHERING_MOLAR_MASS: FloatValue = 12.0;

/// Parameters for oxidative weathering of crustal organic carbon.
///
/// Weathering follows the COPSE formulation:
///
/// $$F_{orgw} = k_{17} \cdot U \cdot \frac{C_{org}}{G_0}$$
///
/// where $G_0$ is the reference organic carbon reservoir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatheringParameters {
    /// Organic carbon weathering rate at the reference reservoir size
    /// unit: mol C / yr
    /// default: 7.75e12
    pub rate: FloatValue,

    /// Reference crustal organic carbon reservoir (COPSE initial value)
    /// unit: mol C
    /// default: 1.25e21
    pub reference_reservoir: FloatValue,

    /// Relative uplift rate
    /// unit: dimensionless
    /// default: 1
    pub uplift: FloatValue,
}

impl WeatheringParameters {
    /// Weathering rate converted to g C / Myr
    pub fn rate_g_per_myr(&self) -> FloatValue {
        self.rate * WEATHERING_MOLAR_MASS * 1e6
    }

    /// Reference reservoir converted to g C
    pub fn reference_reservoir_mass(&self) -> FloatValue {
        self.reference_reservoir * WEATHERING_MOLAR_MASS
    }
}

impl Default for WeatheringParameters {
    fn default() -> Self {
        Self {
            rate: 7.75e12,
            reference_reservoir: 1.25e21,
            uplift: 1.0,
        }
    }
}

/// Parameters for the oxygen diagnostics.
///
/// Every mole of buried organic carbon (crustal plus subducted) is assumed to
/// have released one mole of O2 to the atmosphere-ocean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OxygenParameters {
    /// Mass of the present-day atmosphere
    /// unit: kg
    /// default: 5.15e18
    pub atmosphere_mass: FloatValue,

    /// Mass fraction of O2 used for the present atmospheric level
    /// unit: dimensionless
    /// default: 0.21
    pub oxygen_fraction: FloatValue,

    /// unit: g / mol
    /// default: 12.011
    pub carbon_molar_mass: FloatValue,

    /// unit: g / mol
    /// default: 15.999
    pub oxygen_molar_mass: FloatValue,
}

impl OxygenParameters {
    /// Present-day O2 mass (g), the unit of the PAL diagnostic
    pub fn present_day_oxygen_mass(&self) -> FloatValue {
        self.atmosphere_mass * 1000.0 * self.oxygen_fraction
    }
}

impl Default for OxygenParameters {
    fn default() -> Self {
        Self {
            atmosphere_mass: 5.15e18,
            oxygen_fraction: 0.21,
            carbon_molar_mass: 12.011,
            oxygen_molar_mass: 15.999,
        }
    }
}
