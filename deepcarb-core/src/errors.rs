use crate::timeseries::{FloatValue, Time};
use thiserror::Error;

/// Error type for invalid parameters and failed model steps.
#[derive(Error, Debug)]
pub enum CarbonCycleError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("Invalid perturbation schedule: {0}")]
    InvalidSchedule(String),
    #[error("Total {flux} flux is zero at step {step}, isotopic mixing is undefined")]
    ZeroTotalFlux { flux: &'static str, step: Time },
    #[error("Non-finite value {value} for {variable} at step {step}")]
    NonFinite {
        variable: &'static str,
        step: Time,
        value: FloatValue,
    },
    #[error("Model has already reached the end of its time axis")]
    ModelFinished,
    #[error("Failed to parse parameters: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Failed to serialise parameters: {0}")]
    ConfigSerialise(#[from] toml::ser::Error),
}

impl CarbonCycleError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience type for `Result<T, CarbonCycleError>`.
pub type CarbonCycleResult<T> = Result<T, CarbonCycleError>;
