//! Surface burial, subduction recycling and mantle degassing parameters.

use crate::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};

/// Partitioning of surface carbon burial and the isotopic closure of the
/// crustal reservoirs.
///
/// Carbon leaves the atmosphere-ocean at a rate $k \cdot C_{atm}$, split into
/// organic carbon ($f_{org}$) and carbonate ($1 - f_{org}$).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceParameters {
    /// Fraction of buried carbon deposited as organic carbon
    /// unit: dimensionless
    /// default: 0.2
    pub organic_fraction: FloatValue,

    /// δ13C offset of newly formed carbonate relative to the atmosphere-ocean
    /// unit: ‰
    /// default: 5
    pub carbonate_offset: FloatValue,

    /// δ13C offset of newly formed organic carbon relative to the atmosphere-ocean
    /// unit: ‰
    /// default: -20
    pub organic_offset: FloatValue,
}

impl SurfaceParameters {
    /// Fraction of buried carbon deposited as carbonate, $1 - f_{org}$
    pub fn carbonate_fraction(&self) -> FloatValue {
        1.0 - self.organic_fraction
    }
}

impl Default for SurfaceParameters {
    fn default() -> Self {
        Self {
            organic_fraction: 0.2,
            carbonate_offset: 5.0,
            organic_offset: -20.0,
        }
    }
}

/// Routing of subducted carbon back to the surface.
///
/// Subducted carbonate returns at arcs after `carbonate_lag` steps. Subducted
/// organic carbon returns at ocean islands after the schedule's organic lag.
/// The arc fractions split each subducted flavour between the two pathways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecyclingParameters {
    /// Mantle residence time of subducted carbonate before arc release
    /// unit: Myr
    /// default: 30
    pub carbonate_lag: Time,

    /// Fraction of subducted organic carbon released at arcs (rest at OIBs)
    /// unit: dimensionless
    /// default: 0
    pub arc_organic_fraction: FloatValue,

    /// Fraction of subducted carbonate released at arcs (rest at OIBs)
    /// unit: dimensionless
    /// default: 1
    pub arc_carbonate_fraction: FloatValue,

    /// Fraction of subducted organic carbon retained permanently in the mantle
    /// unit: dimensionless
    /// default: 0
    pub organic_retention: FloatValue,

    /// Fraction of subducted carbonate retained permanently in the mantle
    /// unit: dimensionless
    /// default: 0
    pub carbonate_retention: FloatValue,
}

impl Default for RecyclingParameters {
    fn default() -> Self {
        Self {
            carbonate_lag: 30,
            arc_organic_fraction: 0.0,
            arc_carbonate_fraction: 1.0,
            organic_retention: 0.0,
            carbonate_retention: 0.0,
        }
    }
}

/// Background degassing of primordial mantle carbon.
///
/// The arc and OIB backgrounds are constant; the MOR flux is only the initial
/// value and is replaced by the perturbation schedule after each event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegassingParameters {
    /// MOR flux before the first event
    /// unit: g / Myr
    /// default: 1e18
    pub mor_initial: FloatValue,

    /// Primordial contribution to the OIB flux
    /// unit: g / Myr
    /// default: 1e18
    pub oib_background: FloatValue,

    /// Primordial contribution to the arc flux
    /// unit: g / Myr
    /// default: 1e18
    pub arc_background: FloatValue,
}

impl Default for DegassingParameters {
    fn default() -> Self {
        Self {
            mor_initial: 1e18,
            oib_background: 1e18,
            arc_background: 1e18,
        }
    }
}
