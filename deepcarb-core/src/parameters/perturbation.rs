//! Perturbation schedule parameters
//!
//! Three scripted tectonic events raise the weathering constant, the subduction
//! efficiencies and the MOR flux, after which weathering decays back toward a
//! floor. A final rise in weathering follows the third event.
//!
//! # Reference values
//!
//! | Event | Age (Ma) | Peak k | Floor k | Decay (Myr) | Organic lag (Myr) |
//! |-------|----------|--------|---------|-------------|-------------------|
//! | 1 (GOE and Lomagundi) | 2380 | 2e-3 | 1e-5 | 350 | 310 |
//! | 2 (Nuna breakup)      | 1400 | 2e-4 | 2e-5 | 300 | 400 |
//! | 3 (Rodinia breakup)   |  800 | 9e-4 | 7e-5 | 200 | 230 |
//!
//! The final rise lifts k to 1.2e-3 over 100 Myr.

use crate::errors::{CarbonCycleError, CarbonCycleResult};
use crate::parameters::TimeDomainParameters;
use crate::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};

/// Fractions of newly deposited carbon that are subducted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubductionEfficiency {
    /// unit: dimensionless
    pub organic: FloatValue,
    /// unit: dimensionless
    pub carbonate: FloatValue,
}

impl SubductionEfficiency {
    pub const fn new(organic: FloatValue, carbonate: FloatValue) -> Self {
        Self { organic, carbonate }
    }
}

/// A single scripted tectonic event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TectonicEvent {
    /// Age of the event before present
    /// unit: Ma
    pub age: Time,

    /// Weathering constant set at the event step
    /// unit: 1 / Myr
    pub weathering_peak: FloatValue,

    /// Weathering constant reached at the end of the decay window
    /// unit: 1 / Myr
    pub weathering_floor: FloatValue,

    /// Length of the linear weathering decay after the event
    /// unit: Myr
    pub decay_length: Time,

    /// MOR flux from the event onwards
    /// unit: g / Myr
    pub mor_flux: FloatValue,

    /// Mantle residence time of subducted organic carbon in this epoch.
    /// The first event's lag also applies before the first event.
    /// unit: Myr
    pub organic_lag: Time,
}

impl TectonicEvent {
    /// Elapsed time of the event for a timeline whose present day is `present`
    pub fn elapsed(&self, present: Time) -> Time {
        present.saturating_sub(self.age)
    }
}

/// Parameters of the three-event perturbation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerturbationParameters {
    /// Weathering constant before the first event
    /// unit: 1 / Myr
    /// default: 1e-9
    pub baseline_weathering: FloatValue,

    /// Weathering constant reached at the end of the final rise
    /// unit: 1 / Myr
    /// default: 1.2e-3
    pub final_weathering: FloatValue,

    /// Length of the final weathering rise following the third decay
    /// unit: Myr
    /// default: 100
    pub final_rise_length: Time,

    /// Events, oldest first
    pub events: [TectonicEvent; 3],

    /// Subduction efficiencies outside event decay windows
    /// default: 0.1 / 0.1
    pub baseline_subduction: SubductionEfficiency,

    /// Subduction efficiencies at events and during their decay windows
    /// default: 0.999 / 0.999
    pub elevated_subduction: SubductionEfficiency,

    /// Subduction efficiencies from the final rise onwards
    /// default: 0.1 / 0.1
    pub final_subduction: SubductionEfficiency,
}

impl PerturbationParameters {
    /// Event times as elapsed steps, oldest first
    pub fn event_times(&self, present: Time) -> [Time; 3] {
        [
            self.events[0].elapsed(present),
            self.events[1].elapsed(present),
            self.events[2].elapsed(present),
        ]
    }

    /// Check that the events form eleven contiguous, non-overlapping regimes
    pub fn validate(&self, time_domain: &TimeDomainParameters) -> CarbonCycleResult<()> {
        let present = time_domain.present;

        for (i, event) in self.events.iter().enumerate() {
            if event.age >= present {
                return Err(CarbonCycleError::InvalidSchedule(format!(
                    "event {} at {} Ma does not postdate the start of the run ({} Ma)",
                    i + 1,
                    event.age,
                    present
                )));
            }
            if event.decay_length == 0 {
                return Err(CarbonCycleError::InvalidSchedule(format!(
                    "event {} has a zero decay length",
                    i + 1
                )));
            }
            if event.organic_lag == 0 {
                return Err(CarbonCycleError::InvalidSchedule(format!(
                    "event {} has a zero organic carbon lag",
                    i + 1
                )));
            }
        }
        if self.final_rise_length == 0 {
            return Err(CarbonCycleError::InvalidSchedule(
                "the final weathering rise has zero length".to_string(),
            ));
        }

        for pair in self.events.windows(2) {
            let (earlier, later) = (&pair[0], &pair[1]);
            if earlier.age <= later.age {
                return Err(CarbonCycleError::InvalidSchedule(format!(
                    "event ages must be strictly descending, got {} Ma then {} Ma",
                    earlier.age, later.age
                )));
            }
            let decay_end = earlier
                .elapsed(present)
                .checked_add(earlier.decay_length);
            if decay_end.map_or(true, |end| end > later.elapsed(present)) {
                return Err(CarbonCycleError::InvalidSchedule(format!(
                    "decay after the {} Ma event runs past the {} Ma event",
                    earlier.age, later.age
                )));
            }
        }

        // The final rise starts one step after the inclusive third decay
        let [_, _, tc3] = self.event_times(present);
        let rise_end = tc3
            .checked_add(self.events[2].decay_length)
            .and_then(|end| end.checked_add(1))
            .and_then(|end| end.checked_add(self.final_rise_length));
        if rise_end.is_none() {
            return Err(CarbonCycleError::InvalidSchedule(format!(
                "third decay ({} Myr) and final rise ({} Myr) overflow the time axis",
                self.events[2].decay_length, self.final_rise_length
            )));
        }

        Ok(())
    }
}

impl Default for PerturbationParameters {
    fn default() -> Self {
        Self {
            baseline_weathering: 1e-9,
            final_weathering: 1.2e-3,
            final_rise_length: 100,
            events: [
                TectonicEvent {
                    age: 2380,
                    weathering_peak: 2e-3,
                    weathering_floor: 1e-5,
                    decay_length: 350,
                    mor_flux: 1e18,
                    organic_lag: 310,
                },
                TectonicEvent {
                    age: 1400,
                    weathering_peak: 2e-4,
                    weathering_floor: 2e-5,
                    decay_length: 300,
                    mor_flux: 1e18,
                    organic_lag: 400,
                },
                TectonicEvent {
                    age: 800,
                    weathering_peak: 9e-4,
                    weathering_floor: 7e-5,
                    decay_length: 200,
                    mor_flux: 1e18,
                    organic_lag: 230,
                },
            ],
            baseline_subduction: SubductionEfficiency::new(0.1, 0.1),
            elevated_subduction: SubductionEfficiency::new(0.999, 0.999),
            final_subduction: SubductionEfficiency::new(0.1, 0.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_event_times() {
        let params = PerturbationParameters::default();
        assert_eq!(params.event_times(5000), [2620, 3600, 4200]);
    }

    #[test]
    fn default_schedule_is_valid() {
        let params = PerturbationParameters::default();
        assert!(params.validate(&TimeDomainParameters::default()).is_ok());
    }

    #[test]
    fn rejects_unordered_events() {
        let mut params = PerturbationParameters::default();
        params.events.swap(1, 2);
        let err = params
            .validate(&TimeDomainParameters::default())
            .unwrap_err();
        assert!(matches!(err, CarbonCycleError::InvalidSchedule(_)));
    }

    #[test]
    fn rejects_overlapping_decay() {
        let mut params = PerturbationParameters::default();
        // 2620 + 1000 runs past the second event at 3600
        params.events[0].decay_length = 1000;
        assert!(params.validate(&TimeDomainParameters::default()).is_err());
    }

    #[test]
    fn decay_may_end_exactly_at_next_event() {
        let mut params = PerturbationParameters::default();
        params.events[0].decay_length = 980;
        assert!(params.validate(&TimeDomainParameters::default()).is_ok());
    }

    #[test]
    fn rejects_event_at_start_of_run() {
        let mut params = PerturbationParameters::default();
        params.events[0].age = 5000;
        assert!(params.validate(&TimeDomainParameters::default()).is_err());
    }

    #[test]
    fn rejects_zero_lengths() {
        let time_domain = TimeDomainParameters::default();

        let mut params = PerturbationParameters::default();
        params.events[2].decay_length = 0;
        assert!(params.validate(&time_domain).is_err());

        let mut params = PerturbationParameters::default();
        params.final_rise_length = 0;
        assert!(params.validate(&time_domain).is_err());

        let mut params = PerturbationParameters::default();
        params.events[1].organic_lag = 0;
        assert!(params.validate(&time_domain).is_err());
    }

    #[test]
    fn rejects_windows_past_representable_time() {
        let time_domain = TimeDomainParameters::default();

        let mut params = PerturbationParameters::default();
        params.events[2].decay_length = i64::MAX as usize;
        params.final_rise_length = i64::MAX as usize;
        let err = params.validate(&time_domain).unwrap_err();
        assert!(matches!(err, CarbonCycleError::InvalidSchedule(_)));

        let mut params = PerturbationParameters::default();
        params.final_rise_length = usize::MAX;
        assert!(params.validate(&time_domain).is_err());

        let mut params = PerturbationParameters::default();
        params.events[0].decay_length = usize::MAX;
        assert!(params.validate(&time_domain).is_err());
    }
}
