//! Per-step state update
//!
//! Advances the carbon cycle by one 1 Myr step with explicit forward Euler
//! differencing. Reservoirs are updated from the previous step's fluxes, then
//! the new fluxes are derived from the new reservoirs, and finally the isotopic
//! compositions are mixed from the new fluxes.
//!
//! # Algorithm
//!
//! For each step $t$:
//!
//! 1. Update the six reservoirs from the fluxes at $t-1$, draining the mantle
//!    reservoirs by the lagged subduction fluxes
//! 2. Burial: $F_{org} = f_{org} k C_{atm}$, $F_{crb} = (1 - f_{org}) k C_{atm}$
//! 3. Subduction: $F_{sorg} = \chi_{org} F_{org}$, $F_{scrb} = \chi_{crb} F_{crb}$
//! 4. Weathering: $F_{orgw} = k_{17} U C_{org,t-1} / G_0$
//! 5. Arc and OIB degassing from background plus lagged subduction
//! 6. $F_{tot} = F_{oib} + F_{arc} + F_{mor}$
//! 7. δ13C of arc and OIB as flux-weighted means of their sources
//! 8. δ13C of the atmosphere-ocean as the flux-weighted mean of all degassing
//! 9. Crustal carbonate and organic δ13C as fixed offsets from the atmosphere-ocean
//! 10. Oxygen diagnostics
//!
//! The order is significant; each stage reads values written earlier in the same step.

use crate::errors::{CarbonCycleError, CarbonCycleResult};
use crate::parameters::CarbonCycleParameters;
use crate::schedule::Drivers;
use crate::state::CarbonCycleState;
use crate::timeseries::{FloatValue, Time};

/// Recycled slab carbon released by one degassing pathway at a step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecycledFlux {
    /// unit: g / Myr
    pub carbonate: FloatValue,
    /// unit: g / Myr
    pub organic: FloatValue,
}

/// Advances a [`CarbonCycleState`] one step at a time.
#[derive(Debug, Clone, Copy)]
pub struct StateStepper<'a> {
    parameters: &'a CarbonCycleParameters,
}

impl<'a> StateStepper<'a> {
    pub fn new(parameters: &'a CarbonCycleParameters) -> Self {
        Self { parameters }
    }

    /// Fill index `step` of every series from step `step - 1` and the lagged history.
    ///
    /// `step` must be at least 1 and every earlier step must already be filled.
    pub fn advance(
        &self,
        state: &mut CarbonCycleState,
        step: Time,
        drivers: &Drivers,
    ) -> CarbonCycleResult<()> {
        debug_assert!(step >= 1, "step 0 holds the initial conditions");

        self.record_drivers(state, step, drivers);
        self.update_reservoirs(state, step, drivers);
        self.update_burial(state, step, drivers);
        self.update_weathering(state, step);
        let (arc, oib) = self.update_degassing(state, step, drivers);
        self.update_isotopes(state, step, drivers, arc, oib)?;
        state.update_diagnostics(step, self.parameters);

        check_finite(state, step)
    }

    fn record_drivers(&self, state: &mut CarbonCycleState, step: Time, drivers: &Drivers) {
        let d = &mut state.drivers;
        d.weathering_constant
            .set(step, drivers.weathering_constant);
        d.organic_subduction_efficiency
            .set(step, drivers.subduction.organic);
        d.carbonate_subduction_efficiency
            .set(step, drivers.subduction.carbonate);
        d.organic_lag.set(step, drivers.organic_lag as FloatValue);
        state.fluxes.mor.set(step, drivers.mor_flux);
    }

    fn update_reservoirs(&self, state: &mut CarbonCycleState, step: Time, drivers: &Drivers) {
        let recycling = &self.parameters.recycling;
        let degassing = &self.parameters.degassing;
        let prev = step - 1;
        let carbonate_lag = recycling.carbonate_lag;
        let organic_lag = drivers.organic_lag;

        let f = &state.fluxes;
        let f_org = f.organic_deposition.at(prev);
        let f_crb = f.carbonate_deposition.at(prev);
        let f_sorg = f.organic_subduction.at(prev);
        let f_scrb = f.carbonate_subduction.at(prev);
        let f_orgw = f.organic_weathering.at(prev);
        let f_tot = f.total.at(prev);
        let f_mor = f.mor.at(prev);

        // Slab carbon leaving the mantle reservoirs this step
        let carbonate_to_arc = (1.0 - recycling.carbonate_retention)
            * recycling.arc_carbonate_fraction
            * f.carbonate_subduction.lagged_or_zero(step, carbonate_lag);
        let carbonate_to_oib = (1.0 - recycling.carbonate_retention)
            * (1.0 - recycling.arc_carbonate_fraction)
            * f.carbonate_subduction.lagged_or_zero(step, organic_lag);
        let organic_to_oib = (1.0 - recycling.organic_retention)
            * (1.0 - recycling.arc_organic_fraction)
            * f.organic_subduction.lagged_or_zero(step, organic_lag);

        let r = &mut state.reservoirs;
        let atm = r.atmosphere_ocean.at(prev) + (f_tot - (f_org + f_crb)) + f_orgw;
        let crb = r.crustal_carbonate.at(prev) + (f_crb - f_scrb);
        let org = r.crustal_organic.at(prev) + (f_org - f_sorg) - f_orgw;
        let mcrb = r.mantle_carbonate.at(prev) + f_scrb - carbonate_to_arc - carbonate_to_oib;
        let morg = r.mantle_organic.at(prev) + f_sorg - organic_to_oib;
        let mntl = r.primordial_mantle.at(prev)
            - degassing.oib_background
            - f_mor
            - degassing.arc_background;

        r.atmosphere_ocean.set(step, atm);
        r.crustal_carbonate.set(step, crb);
        r.crustal_organic.set(step, org);
        r.mantle_carbonate.set(step, mcrb);
        r.mantle_organic.set(step, morg);
        r.primordial_mantle.set(step, mntl);
    }

    /// Surface burial and the subducted share of it
    fn update_burial(&self, state: &mut CarbonCycleState, step: Time, drivers: &Drivers) {
        let surface = &self.parameters.surface;
        let k = drivers.weathering_constant;
        let atm = state.reservoirs.atmosphere_ocean.at(step);

        let f_org = surface.organic_fraction * k * atm;
        let f_crb = surface.carbonate_fraction() * k * atm;

        let f = &mut state.fluxes;
        f.organic_deposition.set(step, f_org);
        f.carbonate_deposition.set(step, f_crb);
        f.carbonate_subduction
            .set(step, drivers.subduction.carbonate * f_crb);
        f.organic_subduction
            .set(step, drivers.subduction.organic * f_org);
    }

    fn update_weathering(&self, state: &mut CarbonCycleState, step: Time) {
        let weathering = &self.parameters.weathering;
        let f_orgw = (weathering.rate_g_per_myr() * weathering.uplift)
            * (state.reservoirs.crustal_organic.at(step - 1)
                / weathering.reference_reservoir_mass());
        state.fluxes.organic_weathering.set(step, f_orgw);
    }

    /// Arc and OIB degassing. Returns the recycled components of each.
    fn update_degassing(
        &self,
        state: &mut CarbonCycleState,
        step: Time,
        drivers: &Drivers,
    ) -> (RecycledFlux, RecycledFlux) {
        let recycling = &self.parameters.recycling;
        let degassing = &self.parameters.degassing;
        let f = &state.fluxes;

        let arc = match (
            f.carbonate_subduction
                .lagged(step, recycling.carbonate_lag),
            f.organic_subduction.lagged(step, recycling.carbonate_lag),
        ) {
            (Some(scrb), Some(sorg)) => RecycledFlux {
                carbonate: recycling.arc_carbonate_fraction * scrb,
                organic: recycling.arc_organic_fraction * sorg,
            },
            _ => RecycledFlux::default(),
        };
        let oib = match (
            f.carbonate_subduction.lagged(step, drivers.organic_lag),
            f.organic_subduction.lagged(step, drivers.organic_lag),
        ) {
            (Some(scrb), Some(sorg)) => RecycledFlux {
                carbonate: (1.0 - recycling.arc_carbonate_fraction) * scrb,
                organic: (1.0 - recycling.arc_organic_fraction) * sorg,
            },
            _ => RecycledFlux::default(),
        };

        let f_oib = oib.carbonate + oib.organic + degassing.oib_background;
        let f_arc = degassing.arc_background + arc.carbonate + arc.organic;
        let f_tot = f_oib + f_arc + drivers.mor_flux;

        let f = &mut state.fluxes;
        f.oib_organic.set(step, oib.organic);
        f.oib.set(step, f_oib);
        f.arc.set(step, f_arc);
        f.total.set(step, f_tot);

        (arc, oib)
    }

    fn update_isotopes(
        &self,
        state: &mut CarbonCycleState,
        step: Time,
        drivers: &Drivers,
        arc: RecycledFlux,
        oib: RecycledFlux,
    ) -> CarbonCycleResult<()> {
        let recycling = &self.parameters.recycling;
        let degassing = &self.parameters.degassing;
        let surface = &self.parameters.surface;
        let carbonate_lag = recycling.carbonate_lag;
        let organic_lag = drivers.organic_lag;

        let f_oib = nonzero_total("OIB", state.fluxes.oib.at(step), step)?;
        let f_arc = nonzero_total("arc", state.fluxes.arc.at(step), step)?;
        let f_tot = nonzero_total("degassing", state.fluxes.total.at(step), step)?;
        let f_mor = state.fluxes.mor.at(step);

        let i = &state.isotopes;
        let prim = i.primordial_mantle.at(step);

        let d13c_oib = oib.organic / f_oib
            * i.crustal_organic.lagged_or_zero(step, organic_lag)
            * (1.0 - recycling.organic_retention)
            + oib.carbonate / f_oib * i.crustal_carbonate.lagged_or_zero(step, organic_lag)
            + degassing.oib_background / f_oib * prim;

        let d13c_arc = arc.organic / f_arc * i.crustal_organic.lagged_or_zero(step, carbonate_lag)
            + arc.carbonate / f_arc * i.crustal_carbonate.lagged_or_zero(step, carbonate_lag)
            + degassing.arc_background / f_arc * prim;

        let d13c_atm = f_oib / f_tot * d13c_oib
            + f_arc / f_tot * d13c_arc
            + f_mor / f_tot * i.mor.at(step);

        let i = &mut state.isotopes;
        i.oib.set(step, d13c_oib);
        i.arc.set(step, d13c_arc);
        i.atmosphere_ocean.set(step, d13c_atm);
        i.crustal_carbonate
            .set(step, d13c_atm + surface.carbonate_offset);
        i.crustal_organic.set(step, d13c_atm + surface.organic_offset);

        Ok(())
    }
}

fn nonzero_total(
    flux: &'static str,
    value: FloatValue,
    step: Time,
) -> CarbonCycleResult<FloatValue> {
    if value == 0.0 {
        Err(CarbonCycleError::ZeroTotalFlux { flux, step })
    } else {
        Ok(value)
    }
}

/// Reject any NaN or infinity written at `step`
fn check_finite(state: &CarbonCycleState, step: Time) -> CarbonCycleResult<()> {
    for (var, series) in state.iter() {
        let value = series.at(step);
        if !value.is_finite() {
            return Err(CarbonCycleError::NonFinite {
                variable: var.name,
                step,
                value,
            });
        }
    }
    Ok(())
}
