//! Dense, fixed-length time series on a unit (1 Myr) time axis.

use ndarray::{Array, Array1, ArrayView1};
use serde::{Deserialize, Serialize};

pub type FloatValue = f64;

/// Index of a model step. One step is one million years of elapsed time.
pub type Time = usize;

/// Time axis of a run, from step 0 up to and including the final step.
///
/// Values are elapsed model time in Myr. Ages before present (Ma) are derived
/// from the `present` step, so the axis can be read either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    values: Array1<FloatValue>,
    present: Time,
}

impl TimeAxis {
    /// Axis covering `0..=duration` in unit steps
    pub fn from_duration(duration: Time, present: Time) -> Self {
        Self {
            values: Array::range(0.0, (duration + 1) as FloatValue, 1.0),
            present,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of the last step on the axis
    pub fn last_step(&self) -> Time {
        self.len().saturating_sub(1)
    }

    pub fn values(&self) -> ArrayView1<FloatValue> {
        self.values.view()
    }

    pub fn at(&self, step: Time) -> Option<FloatValue> {
        self.values.get(step).copied()
    }

    pub fn present(&self) -> Time {
        self.present
    }

    /// Age before present (Ma) of every step
    ///
    /// Steps after `present` have negative ages.
    pub fn ages(&self) -> Array1<FloatValue> {
        self.values.mapv(|t| self.present as FloatValue - t)
    }

    pub fn age_at(&self, step: Time) -> Option<FloatValue> {
        self.at(step).map(|t| self.present as FloatValue - t)
    }

    /// Step corresponding to an age before present, if it lies on the axis
    pub fn step_for_age(&self, age: Time) -> Option<Time> {
        let step = self.present.checked_sub(age)?;
        (step < self.len()).then_some(step)
    }
}

/// A single model variable sampled at every step of a [`TimeAxis`].
///
/// Series are allocated once at full length and filled in increasing step order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    values: Array1<FloatValue>,
}

impl Timeseries {
    pub fn zeros(len: usize) -> Self {
        Self {
            values: Array1::zeros(len),
        }
    }

    pub fn filled(len: usize, value: FloatValue) -> Self {
        Self {
            values: Array1::from_elem(len, value),
        }
    }

    pub fn from_values(values: Array1<FloatValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `step`
    ///
    /// # Panics
    /// Panics if `step` is past the end of the series.
    pub fn at(&self, step: Time) -> FloatValue {
        self.values[step]
    }

    pub fn get(&self, step: Time) -> Option<FloatValue> {
        self.values.get(step).copied()
    }

    pub fn set(&mut self, step: Time, value: FloatValue) {
        self.values[step] = value;
    }

    /// Delay-line lookup of the value `lag` steps before `step`.
    ///
    /// Returns `None` while `step <= lag`: no subducted history exists yet at or
    /// before the start of the series, and callers treat the contribution as zero.
    pub fn lagged(&self, step: Time, lag: Time) -> Option<FloatValue> {
        if step <= lag {
            None
        } else {
            self.get(step - lag)
        }
    }

    /// Delay-line lookup that yields zero before the start of the series
    pub fn lagged_or_zero(&self, step: Time, lag: Time) -> FloatValue {
        self.lagged(step, lag).unwrap_or(0.0)
    }

    pub fn values(&self) -> ArrayView1<FloatValue> {
        self.values.view()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloatValue> {
        self.values.iter()
    }

    pub fn into_array(self) -> Array1<FloatValue> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn axis_covers_both_ends() {
        let axis = TimeAxis::from_duration(5000, 5000);
        assert_eq!(axis.len(), 5001);
        assert_eq!(axis.at(0), Some(0.0));
        assert_eq!(axis.at(5000), Some(5000.0));
        assert_eq!(axis.at(5001), None);
        assert_eq!(axis.last_step(), 5000);
    }

    #[test]
    fn ages_count_back_from_present() {
        let axis = TimeAxis::from_duration(4, 3);
        assert_eq!(axis.ages(), array![3.0, 2.0, 1.0, 0.0, -1.0]);
        assert_eq!(axis.age_at(1), Some(2.0));
        assert_eq!(axis.step_for_age(3), Some(0));
        assert_eq!(axis.step_for_age(0), Some(3));
        assert_eq!(axis.step_for_age(4), None);
    }

    #[test]
    fn step_for_age_off_axis() {
        let axis = TimeAxis::from_duration(10, 20);
        assert_eq!(axis.step_for_age(5), None);
        assert_eq!(axis.step_for_age(12), Some(8));
    }

    #[test]
    fn lagged_is_unavailable_until_lag_has_elapsed() {
        let series = Timeseries::from_values(array![1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(series.lagged(0, 2), None);
        assert_eq!(series.lagged(2, 2), None);
        assert_eq!(series.lagged(3, 2), Some(2.0));
        assert_eq!(series.lagged(4, 2), Some(3.0));
        assert_eq!(series.lagged_or_zero(1, 2), 0.0);
        assert_eq!(series.lagged_or_zero(4, 1), 4.0);
    }

    #[test]
    fn set_and_get() {
        let mut series = Timeseries::filled(3, -5.0);
        series.set(1, 2.5);
        assert_eq!(series.at(1), 2.5);
        assert_eq!(series.get(2), Some(-5.0));
        assert_eq!(series.get(3), None);
    }
}
