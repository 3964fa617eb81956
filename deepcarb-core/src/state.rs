//! Storage for every series of a run.
//!
//! The state is a set of equal-length [`Timeseries`], one per variable in
//! [`crate::standard_variables`]. Index 0 holds the initial conditions and the
//! stepper fills the remaining indices in increasing order.

use crate::parameters::CarbonCycleParameters;
use crate::standard_variables::*;
use crate::timeseries::{FloatValue, Time, Timeseries};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Carbon reservoir masses (g)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservoirs {
    pub atmosphere_ocean: Timeseries,
    pub crustal_carbonate: Timeseries,
    pub crustal_organic: Timeseries,
    pub mantle_carbonate: Timeseries,
    pub mantle_organic: Timeseries,
    pub primordial_mantle: Timeseries,
}

/// δ13C of reservoirs and degassing pathways (‰)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Isotopes {
    pub atmosphere_ocean: Timeseries,
    pub crustal_carbonate: Timeseries,
    pub crustal_organic: Timeseries,
    pub primordial_mantle: Timeseries,
    pub arc: Timeseries,
    pub oib: Timeseries,
    pub mor: Timeseries,
}

/// Carbon fluxes (g / Myr)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fluxes {
    pub organic_deposition: Timeseries,
    pub carbonate_deposition: Timeseries,
    pub organic_subduction: Timeseries,
    pub carbonate_subduction: Timeseries,
    pub mor: Timeseries,
    pub organic_weathering: Timeseries,
    pub arc: Timeseries,
    pub oib: Timeseries,
    pub oib_organic: Timeseries,
    pub total: Timeseries,
}

/// Schedule values applied at each step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSeries {
    pub weathering_constant: Timeseries,
    pub organic_subduction_efficiency: Timeseries,
    pub carbonate_subduction_efficiency: Timeseries,
    pub organic_lag: Timeseries,
}

/// Oxygen bookkeeping derived from the organic reservoirs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub organic_carbon_moles: Timeseries,
    pub oxygen_mass: Timeseries,
    pub oxygen_pal: Timeseries,
}

/// Complete state history of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonCycleState {
    pub reservoirs: Reservoirs,
    pub isotopes: Isotopes,
    pub fluxes: Fluxes,
    pub drivers: DriverSeries,
    pub diagnostics: Diagnostics,
}

impl CarbonCycleState {
    /// Allocate every series at full length and write the initial conditions at step 0
    pub fn initial(parameters: &CarbonCycleParameters) -> Self {
        let n = parameters.time_domain.n_steps();
        let initial = &parameters.initial;
        let perturbation = &parameters.perturbation;
        let degassing = &parameters.degassing;
        let prim = initial.d13c_primordial_mantle;

        let with_initial = |value: FloatValue| {
            let mut series = Timeseries::zeros(n);
            series.set(0, value);
            series
        };

        let baseline_weathering = perturbation.baseline_weathering;
        let atm = initial.atmosphere_ocean;

        let reservoirs = Reservoirs {
            atmosphere_ocean: with_initial(atm),
            crustal_carbonate: with_initial(initial.crustal_carbonate),
            crustal_organic: with_initial(initial.crustal_organic),
            mantle_carbonate: with_initial(initial.mantle_carbonate),
            mantle_organic: with_initial(initial.mantle_organic),
            primordial_mantle: with_initial(initial.primordial_mantle),
        };

        let isotopes = Isotopes {
            atmosphere_ocean: with_initial(initial.d13c_atmosphere_ocean),
            crustal_carbonate: with_initial(initial.d13c_crustal_carbonate),
            crustal_organic: with_initial(initial.d13c_crustal_organic),
            primordial_mantle: Timeseries::filled(n, prim),
            arc: with_initial(prim),
            oib: with_initial(prim),
            mor: Timeseries::filled(n, prim),
        };

        let f_oib = degassing.oib_background;
        let f_arc = degassing.arc_background;
        let f_mor = degassing.mor_initial;
        let fluxes = Fluxes {
            organic_deposition: with_initial(
                parameters.surface.organic_fraction * baseline_weathering * atm,
            ),
            carbonate_deposition: with_initial(
                parameters.surface.carbonate_fraction() * baseline_weathering * atm,
            ),
            // Nothing has been deposited yet, so nothing is subducted
            organic_subduction: Timeseries::zeros(n),
            carbonate_subduction: Timeseries::zeros(n),
            mor: Timeseries::filled(n, f_mor),
            organic_weathering: Timeseries::zeros(n),
            arc: with_initial(f_arc),
            oib: with_initial(f_oib),
            oib_organic: Timeseries::zeros(n),
            total: with_initial(f_oib + f_arc + f_mor),
        };

        let baseline = perturbation.baseline_subduction;
        let drivers = DriverSeries {
            weathering_constant: with_initial(baseline_weathering),
            organic_subduction_efficiency: with_initial(baseline.organic),
            carbonate_subduction_efficiency: with_initial(baseline.carbonate),
            organic_lag: with_initial(perturbation.events[0].organic_lag as FloatValue),
        };

        let mut state = Self {
            reservoirs,
            isotopes,
            fluxes,
            drivers,
            diagnostics: Diagnostics {
                organic_carbon_moles: Timeseries::zeros(n),
                oxygen_mass: Timeseries::zeros(n),
                oxygen_pal: Timeseries::zeros(n),
            },
        };
        state.update_diagnostics(0, parameters);
        state
    }

    /// Number of samples in each series
    pub fn len(&self) -> usize {
        self.reservoirs.atmosphere_ocean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Oxygen released by the organic carbon stored at `step`
    pub(crate) fn update_diagnostics(&mut self, step: Time, parameters: &CarbonCycleParameters) {
        let oxygen = &parameters.oxygen;
        let moles = (self.reservoirs.crustal_organic.at(step)
            + self.reservoirs.mantle_organic.at(step))
            / oxygen.carbon_molar_mass;
        // One mole of O2 per mole of organic carbon buried
        let o2_mass = moles * oxygen.oxygen_molar_mass * 2.0;

        self.diagnostics.organic_carbon_moles.set(step, moles);
        self.diagnostics.oxygen_mass.set(step, o2_mass);
        self.diagnostics
            .oxygen_pal
            .set(step, o2_mass / oxygen.present_day_oxygen_mass());
    }

    /// Every series paired with its variable definition, in output order
    pub fn iter(&self) -> impl Iterator<Item = (&'static VariableDefinition, &Timeseries)> {
        let r = &self.reservoirs;
        let i = &self.isotopes;
        let f = &self.fluxes;
        let d = &self.drivers;
        let g = &self.diagnostics;
        [
            (&VAR_ATMOSPHERE_OCEAN, &r.atmosphere_ocean),
            (&VAR_CRUSTAL_CARBONATE, &r.crustal_carbonate),
            (&VAR_CRUSTAL_ORGANIC, &r.crustal_organic),
            (&VAR_MANTLE_CARBONATE, &r.mantle_carbonate),
            (&VAR_MANTLE_ORGANIC, &r.mantle_organic),
            (&VAR_PRIMORDIAL_MANTLE, &r.primordial_mantle),
            (&VAR_D13C_ATMOSPHERE_OCEAN, &i.atmosphere_ocean),
            (&VAR_D13C_CRUSTAL_CARBONATE, &i.crustal_carbonate),
            (&VAR_D13C_CRUSTAL_ORGANIC, &i.crustal_organic),
            (&VAR_D13C_PRIMORDIAL_MANTLE, &i.primordial_mantle),
            (&VAR_D13C_ARC, &i.arc),
            (&VAR_D13C_OIB, &i.oib),
            (&VAR_D13C_MOR, &i.mor),
            (&VAR_ORGANIC_DEPOSITION, &f.organic_deposition),
            (&VAR_CARBONATE_DEPOSITION, &f.carbonate_deposition),
            (&VAR_ORGANIC_SUBDUCTION, &f.organic_subduction),
            (&VAR_CARBONATE_SUBDUCTION, &f.carbonate_subduction),
            (&VAR_MOR_FLUX, &f.mor),
            (&VAR_ORGANIC_WEATHERING, &f.organic_weathering),
            (&VAR_ARC_FLUX, &f.arc),
            (&VAR_OIB_FLUX, &f.oib),
            (&VAR_OIB_ORGANIC_FLUX, &f.oib_organic),
            (&VAR_TOTAL_FLUX, &f.total),
            (&VAR_WEATHERING_CONSTANT, &d.weathering_constant),
            (
                &VAR_ORGANIC_SUBDUCTION_EFFICIENCY,
                &d.organic_subduction_efficiency,
            ),
            (
                &VAR_CARBONATE_SUBDUCTION_EFFICIENCY,
                &d.carbonate_subduction_efficiency,
            ),
            (&VAR_ORGANIC_LAG, &d.organic_lag),
            (&VAR_ORGANIC_CARBON_MOLES, &g.organic_carbon_moles),
            (&VAR_OXYGEN_MASS, &g.oxygen_mass),
            (&VAR_OXYGEN_PAL, &g.oxygen_pal),
        ]
        .into_iter()
    }

    /// Look up a series by its standard variable name
    pub fn get_by_name(&self, name: &str) -> Option<&Timeseries> {
        self.iter()
            .find(|(var, _)| var.name == name)
            .map(|(_, series)| series)
    }

    /// Total subduction flux, $F_{scrb} + F_{sorg}$
    pub fn subduction_flux(&self) -> Array1<FloatValue> {
        &self.fluxes.carbonate_subduction.values() + &self.fluxes.organic_subduction.values()
    }

    /// Carbon buried on the continents rather than subducted,
    /// $F_{org} + F_{crb} - (F_{scrb} + F_{sorg})$
    pub fn continental_burial_flux(&self) -> Array1<FloatValue> {
        &self.fluxes.organic_deposition.values() + &self.fluxes.carbonate_deposition.values()
            - self.subduction_flux()
    }

    /// Steps at which each reservoir is negative
    pub fn negative_reservoir_steps(&self) -> Vec<(&'static str, Time)> {
        self.iter()
            .filter(|(var, _)| var.name.starts_with("Carbon Reservoir|"))
            .flat_map(|(var, series)| {
                series
                    .iter()
                    .enumerate()
                    .filter(|(_, value)| **value < 0.0)
                    .map(move |(step, _)| (var.name, step))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_variables::ALL_VARIABLES;
    use is_close::is_close;

    #[test]
    fn initial_state_matches_initial_conditions() {
        let params = CarbonCycleParameters::default();
        let state = CarbonCycleState::initial(&params);

        assert_eq!(state.len(), 5001);
        assert_eq!(state.reservoirs.atmosphere_ocean.at(0), 0.0);
        assert_eq!(state.reservoirs.primordial_mantle.at(0), 1e23);
        assert_eq!(state.isotopes.crustal_organic.at(0), -25.0);
        assert_eq!(state.isotopes.atmosphere_ocean.at(0), -5.0);
        assert_eq!(state.isotopes.arc.at(0), -5.0);
        assert_eq!(state.isotopes.oib.at(0), -5.0);
        assert_eq!(state.fluxes.total.at(0), 3e18);
        assert_eq!(state.fluxes.mor.at(5000), 1e18);
        assert_eq!(state.isotopes.mor.at(5000), -5.0);
        assert_eq!(state.diagnostics.oxygen_pal.at(0), 0.0);
    }

    #[test]
    fn every_standard_variable_is_stored() {
        let state = CarbonCycleState::initial(&CarbonCycleParameters::default());
        for var in ALL_VARIABLES {
            let series = state
                .get_by_name(var.name)
                .unwrap_or_else(|| panic!("{} missing", var.name));
            assert_eq!(series.len(), state.len());
        }
        assert_eq!(state.iter().count(), ALL_VARIABLES.len());
    }

    #[test]
    fn derived_fluxes() {
        let mut params = CarbonCycleParameters::default();
        params.time_domain.duration = 2;
        let mut state = CarbonCycleState::initial(&params);
        state.fluxes.organic_deposition.set(1, 10.0);
        state.fluxes.carbonate_deposition.set(1, 40.0);
        state.fluxes.organic_subduction.set(1, 1.0);
        state.fluxes.carbonate_subduction.set(1, 4.0);

        assert_eq!(state.subduction_flux()[1], 5.0);
        assert_eq!(state.continental_burial_flux()[1], 45.0);
    }

    #[test]
    fn negative_reservoirs_are_found() {
        let mut params = CarbonCycleParameters::default();
        params.time_domain.duration = 3;
        let mut state = CarbonCycleState::initial(&params);
        state.reservoirs.mantle_organic.set(2, -1.0);

        assert_eq!(
            state.negative_reservoir_steps(),
            vec![(VAR_MANTLE_ORGANIC.name, 2)]
        );
    }

    #[test]
    fn json_round_trip() {
        let mut params = CarbonCycleParameters::default();
        params.time_domain.duration = 10;
        let state = CarbonCycleState::initial(&params);

        let json = serde_json::to_string(&state).expect("Serialization failed");
        let parsed: CarbonCycleState = serde_json::from_str(&json).expect("Deserialization failed");

        assert_eq!(parsed.len(), state.len());
        for ((var, expected), (_, actual)) in state.iter().zip(parsed.iter()) {
            for (a, b) in expected.iter().zip(actual.iter()) {
                assert!(is_close!(*a, *b), "{} changed: {} vs {}", var.name, a, b);
            }
        }
    }
}
