//! Time domain of a run.

use crate::timeseries::Time;
use serde::{Deserialize, Serialize};

/// Extent of the modelled timeline.
///
/// The run starts at elapsed time 0 (Earth formation) and steps in 1 Myr
/// increments up to and including `duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeDomainParameters {
    /// Final step of the run
    /// unit: Myr
    /// default: 5000
    pub duration: Time,

    /// Elapsed time corresponding to the present day, used to convert event
    /// ages and report ages before present
    /// unit: Myr
    /// default: 5000
    pub present: Time,
}

impl TimeDomainParameters {
    /// Number of samples in every series of the run
    pub fn n_steps(&self) -> usize {
        self.duration + 1
    }
}

impl Default for TimeDomainParameters {
    fn default() -> Self {
        Self {
            duration: 5000,
            present: 5000,
        }
    }
}
