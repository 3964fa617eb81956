//! Model parameters
//!
//! The complete, immutable parameter set for a run. Each group has defaults
//! matching the reference experiment, so a parameter file only needs to name
//! the values it changes.

mod cycling;
mod initial_conditions;
mod perturbation;
mod time_domain;
mod weathering;

pub use cycling::{DegassingParameters, RecyclingParameters, SurfaceParameters};
pub use initial_conditions::InitialConditions;
pub use perturbation::{PerturbationParameters, SubductionEfficiency, TectonicEvent};
pub use time_domain::TimeDomainParameters;
pub use weathering::{OxygenParameters, WeatheringParameters};

use crate::errors::{CarbonCycleError, CarbonCycleResult};
use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// All constants of a carbon cycle run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonCycleParameters {
    pub time_domain: TimeDomainParameters,
    pub initial: InitialConditions,
    pub surface: SurfaceParameters,
    pub recycling: RecyclingParameters,
    pub degassing: DegassingParameters,
    pub weathering: WeatheringParameters,
    pub oxygen: OxygenParameters,
    pub perturbation: PerturbationParameters,
}

impl CarbonCycleParameters {
    /// Parse parameters from a TOML document. Missing values take their defaults.
    pub fn from_toml_str(content: &str) -> CarbonCycleResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> CarbonCycleResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check physical ranges and the layout of the perturbation schedule.
    pub fn validate(&self) -> CarbonCycleResult<()> {
        if self.time_domain.duration == 0 {
            return Err(CarbonCycleError::invalid_parameter(
                "time_domain.duration",
                "the run needs at least one step",
            ));
        }

        check_fraction("surface.organic_fraction", self.surface.organic_fraction)?;
        check_fraction(
            "recycling.arc_organic_fraction",
            self.recycling.arc_organic_fraction,
        )?;
        check_fraction(
            "recycling.arc_carbonate_fraction",
            self.recycling.arc_carbonate_fraction,
        )?;
        check_fraction(
            "recycling.organic_retention",
            self.recycling.organic_retention,
        )?;
        check_fraction(
            "recycling.carbonate_retention",
            self.recycling.carbonate_retention,
        )?;
        if self.recycling.carbonate_lag == 0 {
            return Err(CarbonCycleError::invalid_parameter(
                "recycling.carbonate_lag",
                "lag must be at least one step",
            ));
        }

        let perturbation = &self.perturbation;
        for (name, efficiency) in [
            ("baseline_subduction", perturbation.baseline_subduction),
            ("elevated_subduction", perturbation.elevated_subduction),
            ("final_subduction", perturbation.final_subduction),
        ] {
            check_fraction(
                &format!("perturbation.{name}.organic"),
                efficiency.organic,
            )?;
            check_fraction(
                &format!("perturbation.{name}.carbonate"),
                efficiency.carbonate,
            )?;
        }

        check_positive(
            "weathering.reference_reservoir",
            self.weathering.reference_reservoir,
        )?;
        check_positive("oxygen.atmosphere_mass", self.oxygen.atmosphere_mass)?;
        check_positive("oxygen.oxygen_fraction", self.oxygen.oxygen_fraction)?;
        check_positive("oxygen.carbon_molar_mass", self.oxygen.carbon_molar_mass)?;

        perturbation.validate(&self.time_domain)
    }
}

fn check_fraction(name: &str, value: FloatValue) -> CarbonCycleResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CarbonCycleError::invalid_parameter(
            name,
            format!("expected a fraction in [0, 1], got {value}"),
        ))
    }
}

fn check_positive(name: &str, value: FloatValue) -> CarbonCycleResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CarbonCycleError::invalid_parameter(
            name,
            format!("expected a positive value, got {value}"),
        ))
    }
}
