//! Perturbation schedule
//!
//! The timeline is split into eleven contiguous regimes around three tectonic
//! events. Each regime is a [`RegimeWindow`] with explicit boundaries, and the
//! windows are stored in time order so the schedule can be walked as a small
//! state machine.
//!
//! ```text
//!  PreEvent | Onset1 | Decay1 | Plateau1 | Onset2 | Decay2 | Plateau2 | Onset3 | Decay3 | Rise | Terminal
//!           tc1                          tc2                          tc3
//! ```
//!
//! Weathering decays and rises are integrated step by step from the value set
//! at the event step: $k_t = k_{t-1} - \Delta k / L$. They are never
//! interpolated in closed form, so rounding accumulates the same way on every run.

use crate::errors::CarbonCycleResult;
use crate::parameters::{CarbonCycleParameters, PerturbationParameters, SubductionEfficiency};
use crate::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eleven phases of the perturbation schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    PreEvent,
    FirstOnset,
    FirstDecay,
    FirstPlateau,
    SecondOnset,
    SecondDecay,
    SecondPlateau,
    ThirdOnset,
    ThirdDecay,
    FinalRise,
    Terminal,
}

impl Regime {
    /// Event (0-based) that the regime belongs to, if any
    pub fn event(&self) -> Option<usize> {
        match self {
            Regime::PreEvent => None,
            Regime::FirstOnset | Regime::FirstDecay | Regime::FirstPlateau => Some(0),
            Regime::SecondOnset | Regime::SecondDecay | Regime::SecondPlateau => Some(1),
            Regime::ThirdOnset | Regime::ThirdDecay | Regime::FinalRise | Regime::Terminal => {
                Some(2)
            }
        }
    }

    pub fn is_decay(&self) -> bool {
        matches!(
            self,
            Regime::FirstDecay | Regime::SecondDecay | Regime::ThirdDecay
        )
    }

    pub fn is_onset(&self) -> bool {
        matches!(
            self,
            Regime::FirstOnset | Regime::SecondOnset | Regime::ThirdOnset
        )
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Regime::PreEvent => "pre-event",
            Regime::FirstOnset => "first event",
            Regime::FirstDecay => "first decay",
            Regime::FirstPlateau => "first plateau",
            Regime::SecondOnset => "second event",
            Regime::SecondDecay => "second decay",
            Regime::SecondPlateau => "second plateau",
            Regime::ThirdOnset => "third event",
            Regime::ThirdDecay => "third decay",
            Regime::FinalRise => "final rise",
            Regime::Terminal => "terminal",
        };
        write!(f, "{}", name)
    }
}

/// How the weathering constant is set within a regime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeatheringRule {
    /// Hold at a fixed value
    Fixed(FloatValue),
    /// Subtract a fixed increment from the previous step's value.
    /// A negative increment rises.
    Step(FloatValue),
}

/// A regime with its boundaries and the driver values it applies.
///
/// Covers elapsed times in `[start, end)`; an `end` of `None` is open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeWindow {
    pub regime: Regime,
    pub start: Time,
    pub end: Option<Time>,
    pub weathering: WeatheringRule,
    pub mor_flux: FloatValue,
    pub subduction: SubductionEfficiency,
    pub organic_lag: Time,
}

impl RegimeWindow {
    pub fn contains(&self, time: Time) -> bool {
        time >= self.start && self.end.map_or(true, |end| time < end)
    }

    /// Number of steps in the window, `None` when open-ended
    pub fn len(&self) -> Option<Time> {
        self.end.map(|end| end.saturating_sub(self.start))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

/// Values of the time-dependent drivers at a single step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drivers {
    /// Weathering constant, 1 / Myr
    pub weathering_constant: FloatValue,
    /// MOR degassing flux, g / Myr
    pub mor_flux: FloatValue,
    pub subduction: SubductionEfficiency,
    /// Mantle residence time of subducted organic carbon, Myr
    pub organic_lag: Time,
}

/// The full ordered set of regime windows for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerturbationSchedule {
    windows: Vec<RegimeWindow>,
}

impl PerturbationSchedule {
    /// Build the schedule, checking that the events lay out valid windows
    pub fn from_parameters(parameters: &CarbonCycleParameters) -> CarbonCycleResult<Self> {
        parameters
            .perturbation
            .validate(&parameters.time_domain)?;
        Ok(Self::build(
            &parameters.perturbation,
            parameters.degassing.mor_initial,
            parameters.time_domain.present,
        ))
    }

    fn build(p: &PerturbationParameters, mor_initial: FloatValue, present: Time) -> Self {
        let [tc1, tc2, tc3] = p.event_times(present);
        let [e1, e2, e3] = &p.events;

        let baseline = p.baseline_subduction;
        let elevated = p.elevated_subduction;

        let decay = |peak: FloatValue, floor: FloatValue, length: Time| {
            WeatheringRule::Step((peak - floor) / length as FloatValue)
        };

        // The third decay includes its final step, so the rise starts one step later
        let third_decay_end = tc3 + e3.decay_length + 1;
        let rise_end = third_decay_end + p.final_rise_length;

        let window = |regime: Regime,
                      start: Time,
                      end: Option<Time>,
                      weathering: WeatheringRule,
                      mor_flux: FloatValue,
                      subduction: SubductionEfficiency,
                      organic_lag: Time| RegimeWindow {
            regime,
            start,
            end,
            weathering,
            mor_flux,
            subduction,
            organic_lag,
        };

        let windows = vec![
            window(
                Regime::PreEvent,
                0,
                Some(tc1),
                WeatheringRule::Fixed(p.baseline_weathering),
                mor_initial,
                baseline,
                e1.organic_lag,
            ),
            window(
                Regime::FirstOnset,
                tc1,
                Some(tc1 + 1),
                WeatheringRule::Fixed(e1.weathering_peak),
                e1.mor_flux,
                elevated,
                e1.organic_lag,
            ),
            window(
                Regime::FirstDecay,
                tc1 + 1,
                Some(tc1 + e1.decay_length),
                decay(e1.weathering_peak, e1.weathering_floor, e1.decay_length),
                e1.mor_flux,
                elevated,
                e1.organic_lag,
            ),
            window(
                Regime::FirstPlateau,
                tc1 + e1.decay_length,
                Some(tc2),
                WeatheringRule::Fixed(e1.weathering_floor),
                e1.mor_flux,
                baseline,
                e1.organic_lag,
            ),
            window(
                Regime::SecondOnset,
                tc2,
                Some(tc2 + 1),
                WeatheringRule::Fixed(e2.weathering_peak),
                e2.mor_flux,
                elevated,
                e2.organic_lag,
            ),
            window(
                Regime::SecondDecay,
                tc2 + 1,
                Some(tc2 + e2.decay_length),
                decay(e2.weathering_peak, e2.weathering_floor, e2.decay_length),
                e2.mor_flux,
                elevated,
                e2.organic_lag,
            ),
            window(
                Regime::SecondPlateau,
                tc2 + e2.decay_length,
                Some(tc3),
                WeatheringRule::Fixed(e2.weathering_floor),
                e2.mor_flux,
                baseline,
                e2.organic_lag,
            ),
            window(
                Regime::ThirdOnset,
                tc3,
                Some(tc3 + 1),
                WeatheringRule::Fixed(e3.weathering_peak),
                e3.mor_flux,
                elevated,
                e3.organic_lag,
            ),
            window(
                Regime::ThirdDecay,
                tc3 + 1,
                Some(third_decay_end),
                decay(e3.weathering_peak, e3.weathering_floor, e3.decay_length),
                e3.mor_flux,
                elevated,
                e3.organic_lag,
            ),
            window(
                Regime::FinalRise,
                third_decay_end,
                Some(rise_end),
                decay(e3.weathering_floor, p.final_weathering, p.final_rise_length),
                e3.mor_flux,
                p.final_subduction,
                e3.organic_lag,
            ),
            window(
                Regime::Terminal,
                rise_end,
                None,
                WeatheringRule::Fixed(p.final_weathering),
                e3.mor_flux,
                p.final_subduction,
                e3.organic_lag,
            ),
        ];

        Self { windows }
    }

    /// Regime windows in time order
    pub fn windows(&self) -> &[RegimeWindow] {
        &self.windows
    }

    /// Window active at elapsed time `time`
    pub fn window_at(&self, time: Time) -> &RegimeWindow {
        // Windows tile [0, inf) so the search always succeeds; fall back to the
        // open-ended terminal window regardless
        self.windows
            .iter()
            .find(|w| w.contains(time))
            .unwrap_or_else(|| &self.windows[self.windows.len() - 1])
    }

    pub fn regime_at(&self, time: Time) -> Regime {
        self.window_at(time).regime
    }

    /// Driver values at `time`, given the weathering constant of the previous step
    pub fn drivers(&self, time: Time, previous_weathering: FloatValue) -> Drivers {
        let window = self.window_at(time);
        let weathering_constant = match window.weathering {
            WeatheringRule::Fixed(value) => value,
            WeatheringRule::Step(increment) => previous_weathering - increment,
        };

        Drivers {
            weathering_constant,
            mor_flux: window.mor_flux,
            subduction: window.subduction,
            organic_lag: window.organic_lag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn default_schedule() -> PerturbationSchedule {
        PerturbationSchedule::from_parameters(&CarbonCycleParameters::default()).unwrap()
    }

    /// Walk the schedule the way the model does, returning k at every step
    fn integrate_weathering(schedule: &PerturbationSchedule, until: Time) -> Vec<FloatValue> {
        let mut k = vec![1e-9];
        for time in 1..=until {
            let previous = k[time - 1];
            k.push(schedule.drivers(time, previous).weathering_constant);
        }
        k
    }

    #[test]
    fn windows_tile_the_timeline() {
        let schedule = default_schedule();
        let windows = schedule.windows();

        assert_eq!(windows.len(), 11);
        assert_eq!(windows[0].start, 0);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, Some(pair[1].start));
        }
        assert_eq!(windows[10].end, None);
    }

    #[test]
    fn default_boundaries() {
        let schedule = default_schedule();
        let bounds: Vec<_> = schedule
            .windows()
            .iter()
            .map(|w| (w.regime, w.start, w.end))
            .collect();

        assert_eq!(
            bounds,
            vec![
                (Regime::PreEvent, 0, Some(2620)),
                (Regime::FirstOnset, 2620, Some(2621)),
                (Regime::FirstDecay, 2621, Some(2970)),
                (Regime::FirstPlateau, 2970, Some(3600)),
                (Regime::SecondOnset, 3600, Some(3601)),
                (Regime::SecondDecay, 3601, Some(3900)),
                (Regime::SecondPlateau, 3900, Some(4200)),
                (Regime::ThirdOnset, 4200, Some(4201)),
                (Regime::ThirdDecay, 4201, Some(4401)),
                (Regime::FinalRise, 4401, Some(4501)),
                (Regime::Terminal, 4501, None),
            ]
        );
    }

    #[test]
    fn regime_lookup() {
        let schedule = default_schedule();
        assert_eq!(schedule.regime_at(1), Regime::PreEvent);
        assert_eq!(schedule.regime_at(2619), Regime::PreEvent);
        assert_eq!(schedule.regime_at(2620), Regime::FirstOnset);
        assert_eq!(schedule.regime_at(2969), Regime::FirstDecay);
        assert_eq!(schedule.regime_at(2970), Regime::FirstPlateau);
        assert_eq!(schedule.regime_at(4400), Regime::ThirdDecay);
        assert_eq!(schedule.regime_at(4401), Regime::FinalRise);
        assert_eq!(schedule.regime_at(4500), Regime::FinalRise);
        assert_eq!(schedule.regime_at(4501), Regime::Terminal);
        assert_eq!(schedule.regime_at(1_000_000), Regime::Terminal);
    }

    #[test]
    fn onset_sets_peak_exactly() {
        let schedule = default_schedule();
        let k = integrate_weathering(&schedule, 5000);
        assert_eq!(k[2620], 2e-3);
        assert_eq!(k[3600], 2e-4);
        assert_eq!(k[4200], 9e-4);
        assert_eq!(k[2970], 1e-5);
        assert_eq!(k[3900], 2e-5);
        assert_eq!(k[5000], 1.2e-3);
    }

    #[test]
    fn decay_is_iterative() {
        let schedule = default_schedule();
        let k = integrate_weathering(&schedule, 2625);
        let increment = (2e-3 - 1e-5) / 350.0;

        let mut expected = 2e-3;
        for time in 2621..=2625 {
            expected -= increment;
            assert_eq!(k[time], expected);
        }
    }

    #[test]
    fn decay_ends_near_floor() {
        let schedule = default_schedule();
        let k = integrate_weathering(&schedule, 5000);

        // First two decays stop one increment above the floor before the plateau
        let increment = (2e-3 - 1e-5) / 350.0;
        assert!(is_close!(k[2969], 1e-5 + increment, rel_tol = 1e-9));

        // The third decay includes its final step and lands on the floor
        assert!(is_close!(k[4400], 7e-5, rel_tol = 1e-9));
        assert!(is_close!(k[4500], 1.2e-3, rel_tol = 1e-9));
    }

    #[test]
    fn decay_and_rise_are_monotonic() {
        let schedule = default_schedule();
        let k = integrate_weathering(&schedule, 5000);

        for w in schedule.windows() {
            let end = w.end.unwrap_or(5001).min(5001);
            for time in (w.start + 1)..end {
                match w.regime {
                    r if r.is_decay() => assert!(k[time] <= k[time - 1]),
                    Regime::FinalRise => assert!(k[time] >= k[time - 1]),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn subduction_and_lag_by_regime() {
        let schedule = default_schedule();

        let pre = schedule.drivers(100, 1e-9);
        assert_eq!(pre.subduction, SubductionEfficiency::new(0.1, 0.1));
        assert_eq!(pre.organic_lag, 310);
        assert_eq!(pre.mor_flux, 1e18);

        let decay = schedule.drivers(2700, 1e-3);
        assert_eq!(decay.subduction, SubductionEfficiency::new(0.999, 0.999));

        let plateau = schedule.drivers(3000, 1e-5);
        assert_eq!(plateau.subduction, SubductionEfficiency::new(0.1, 0.1));
        assert_eq!(plateau.organic_lag, 310);

        assert_eq!(schedule.drivers(3600, 0.0).organic_lag, 400);
        assert_eq!(schedule.drivers(4199, 0.0).organic_lag, 400);
        assert_eq!(schedule.drivers(4200, 0.0).organic_lag, 230);
        assert_eq!(schedule.drivers(4999, 0.0).organic_lag, 230);
    }

    #[test]
    fn regime_metadata() {
        assert_eq!(Regime::PreEvent.event(), None);
        assert_eq!(Regime::SecondPlateau.event(), Some(1));
        assert_eq!(Regime::Terminal.event(), Some(2));
        assert!(Regime::ThirdDecay.is_decay());
        assert!(!Regime::FinalRise.is_decay());
        assert!(Regime::FirstOnset.is_onset());
        assert_eq!(Regime::FinalRise.to_string(), "final rise");
    }

    #[test]
    fn single_step_decay_leaves_empty_window() {
        let mut params = CarbonCycleParameters::default();
        params.perturbation.events[0].decay_length = 1;
        let schedule = PerturbationSchedule::from_parameters(&params).unwrap();

        assert!(schedule.windows()[2].is_empty());
        assert_eq!(schedule.regime_at(2621), Regime::FirstPlateau);
    }
}
