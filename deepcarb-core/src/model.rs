//! Model struct and run loop.

use crate::errors::{CarbonCycleError, CarbonCycleResult};
use crate::parameters::CarbonCycleParameters;
use crate::schedule::{PerturbationSchedule, Regime};
use crate::state::CarbonCycleState;
use crate::stepper::StateStepper;
use crate::timeseries::{FloatValue, Time, TimeAxis, Timeseries};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A carbon cycle run on a fixed 1 Myr time axis.
///
/// The model owns every time series. Step 0 holds the initial conditions and
/// each call to [`CarbonCycleModel::step`] fills the next index, first
/// evaluating the perturbation schedule and then advancing the state.
#[derive(Debug)]
pub struct CarbonCycleModel {
    parameters: CarbonCycleParameters,
    schedule: PerturbationSchedule,
    time_axis: TimeAxis,
    state: CarbonCycleState,
    /// Index of the last completed step
    time_index: Time,
    regime: Regime,
    /// Reservoirs that have already been reported as negative
    negative_reservoirs: HashSet<&'static str>,
}

impl CarbonCycleModel {
    /// Validate the parameters and allocate the state at full length
    pub fn new(parameters: CarbonCycleParameters) -> CarbonCycleResult<Self> {
        parameters.validate()?;
        let schedule = PerturbationSchedule::from_parameters(&parameters)?;
        let time_axis = TimeAxis::from_duration(
            parameters.time_domain.duration,
            parameters.time_domain.present,
        );
        let state = CarbonCycleState::initial(&parameters);

        Ok(Self {
            regime: schedule.regime_at(0),
            parameters,
            schedule,
            time_axis,
            state,
            time_index: 0,
            negative_reservoirs: HashSet::new(),
        })
    }

    pub fn parameters(&self) -> &CarbonCycleParameters {
        &self.parameters
    }

    pub fn schedule(&self) -> &PerturbationSchedule {
        &self.schedule
    }

    pub fn time_axis(&self) -> &TimeAxis {
        &self.time_axis
    }

    /// Elapsed time (Myr) of the last completed step
    pub fn current_time(&self) -> Time {
        self.time_index
    }

    /// Regime of the last completed step
    pub fn current_regime(&self) -> Regime {
        self.regime
    }

    pub fn finished(&self) -> bool {
        self.time_index >= self.time_axis.last_step()
    }

    /// Solve the next step
    pub fn step(&mut self) -> CarbonCycleResult<()> {
        if self.finished() {
            return Err(CarbonCycleError::ModelFinished);
        }
        let step = self.time_index + 1;

        let regime = self.schedule.regime_at(step);
        if regime != self.regime {
            debug!(
                step,
                age = ?self.time_axis.age_at(step),
                from = %self.regime,
                to = %regime,
                "Entering new perturbation regime"
            );
            self.regime = regime;
        }

        let previous_weathering = self.state.drivers.weathering_constant.at(step - 1);
        let drivers = self.schedule.drivers(step, previous_weathering);
        StateStepper::new(&self.parameters).advance(&mut self.state, step, &drivers)?;

        self.report_negative_reservoirs(step);
        self.time_index = step;
        Ok(())
    }

    /// Solve every remaining step
    pub fn run(&mut self) -> CarbonCycleResult<()> {
        info!(
            steps = self.time_axis.len(),
            start = self.time_index,
            "Running carbon cycle model"
        );
        while !self.finished() {
            self.step()?;
        }
        info!(
            final_step = self.time_index,
            d13c_carbonate = self.state.isotopes.crustal_carbonate.at(self.time_index),
            oxygen_pal = self.state.diagnostics.oxygen_pal.at(self.time_index),
            "Carbon cycle model finished"
        );
        Ok(())
    }

    /// Every series computed so far
    pub fn timeseries(&self) -> &CarbonCycleState {
        &self.state
    }

    pub fn into_output(self) -> ModelOutput {
        ModelOutput {
            time_axis: self.time_axis,
            state: self.state,
            completed: self.time_index,
        }
    }

    fn report_negative_reservoirs(&mut self, step: Time) {
        let r = &self.state.reservoirs;
        let reservoirs = [
            ("atmosphere-ocean", &r.atmosphere_ocean),
            ("crustal carbonate", &r.crustal_carbonate),
            ("crustal organic", &r.crustal_organic),
            ("mantle carbonate", &r.mantle_carbonate),
            ("mantle organic", &r.mantle_organic),
            ("primordial mantle", &r.primordial_mantle),
        ];
        for (name, series) in reservoirs {
            let value = series.at(step);
            if value < 0.0 && self.negative_reservoirs.insert(name) {
                warn!(
                    reservoir = name,
                    step,
                    value,
                    "Reservoir has gone negative; outflows exceed its inflow history"
                );
            }
        }
    }
}

/// Completed time series of a run, ready for plotting or analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub time_axis: TimeAxis,
    pub state: CarbonCycleState,
    completed: Time,
}

impl ModelOutput {
    /// Number of samples in every series
    pub fn len(&self) -> usize {
        self.time_axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_axis.is_empty()
    }

    /// Whether every step on the time axis was solved
    pub fn is_complete(&self) -> bool {
        self.completed == self.time_axis.last_step()
    }

    /// Series for a standard variable name
    pub fn get(&self, name: &str) -> Option<&Timeseries> {
        self.state.get_by_name(name)
    }

    /// Value of a variable at a given age before present
    pub fn at_age(&self, name: &str, age: Time) -> Option<FloatValue> {
        let step = self.time_axis.step_for_age(age)?;
        self.get(name)?.get(step)
    }
}

/// Run a model over its whole time axis
pub fn run_model(parameters: CarbonCycleParameters) -> CarbonCycleResult<ModelOutput> {
    let mut model = CarbonCycleModel::new(parameters)?;
    model.run()?;
    Ok(model.into_output())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_variables::{VAR_CRUSTAL_ORGANIC, VAR_WEATHERING_CONSTANT};
    use is_close::is_close;

    fn short_model(duration: Time) -> CarbonCycleModel {
        let mut params = CarbonCycleParameters::default();
        params.time_domain.duration = duration;
        CarbonCycleModel::new(params).unwrap()
    }

    #[test]
    fn steps_until_finished() {
        let mut model = short_model(5);
        assert_eq!(model.current_time(), 0);
        assert!(!model.finished());

        model.step().unwrap();
        assert_eq!(model.current_time(), 1);

        model.run().unwrap();
        assert!(model.finished());
        assert_eq!(model.current_time(), 5);

        assert!(matches!(model.step(), Err(CarbonCycleError::ModelFinished)));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut params = CarbonCycleParameters::default();
        params.surface.organic_fraction = -0.5;
        assert!(CarbonCycleModel::new(params).is_err());
    }

    #[test]
    fn oversized_final_windows_are_rejected() {
        let mut params = CarbonCycleParameters::default();
        params.perturbation.events[2].decay_length = i64::MAX as usize;
        params.perturbation.final_rise_length = i64::MAX as usize;
        assert!(matches!(
            CarbonCycleModel::new(params),
            Err(CarbonCycleError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn regime_follows_the_schedule() {
        let mut model = short_model(2700);
        while model.current_time() < 2619 {
            model.step().unwrap();
        }
        assert_eq!(model.current_regime(), Regime::PreEvent);

        model.step().unwrap();
        assert_eq!(model.current_time(), 2620);
        assert_eq!(model.current_regime(), Regime::FirstOnset);

        model.step().unwrap();
        assert_eq!(model.current_regime(), Regime::FirstDecay);
    }

    #[test]
    fn output_lookup() {
        let mut model = short_model(100);
        model.run().unwrap();
        let output = model.into_output();

        assert!(output.is_complete());
        assert_eq!(output.len(), 101);
        assert_eq!(output.get(VAR_CRUSTAL_ORGANIC.name).unwrap().len(), 101);
        assert!(output.get("Not A Variable").is_none());

        // Step 100 is 4900 Ma with the present at 5000 Myr
        let k = output.at_age(VAR_WEATHERING_CONSTANT.name, 4900).unwrap();
        assert!(is_close!(k, 1e-9));
        assert!(output.at_age(VAR_WEATHERING_CONSTANT.name, 4000).is_none());
    }

    #[test]
    fn incomplete_output() {
        let mut model = short_model(10);
        model.step().unwrap();
        let output = model.into_output();
        assert!(!output.is_complete());
    }
}
