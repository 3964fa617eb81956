//! Standard variable definitions.
//!
//! Every series produced by a run is identified by one of the definitions in
//! this module. Names use `|` as a hierarchical separator:
//! - `Carbon Reservoir|Crustal Organic` - crustal organic carbon mass
//! - `Carbon Flux|Arc` - arc degassing flux
//! - `Isotopic Composition|Arc` - δ13C of arc degassing
//!
//! # Usage
//!
//! ```rust
//! use deepcarb_core::standard_variables::{find_variable, VAR_ARC_FLUX};
//!
//! assert_eq!(VAR_ARC_FLUX.name, "Carbon Flux|Arc");
//! assert_eq!(find_variable("Carbon Flux|Arc").unwrap().unit, "g / Myr");
//! ```

/// Name, unit and description of a model series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableDefinition {
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
}

/// Declare a `VariableDefinition` constant
#[macro_export]
macro_rules! define_static_variable {
    ($ident:ident, name = $name:expr, unit = $unit:expr, description = $description:expr $(,)?) => {
        pub const $ident: $crate::standard_variables::VariableDefinition =
            $crate::standard_variables::VariableDefinition {
                name: $name,
                unit: $unit,
                description: $description,
            };
    };
}

// ============================================================================
// Reservoirs
// ============================================================================

define_static_variable!(
    VAR_ATMOSPHERE_OCEAN,
    name = "Carbon Reservoir|Atmosphere-Ocean",
    unit = "g",
    description = "Carbon held in the coupled atmosphere-ocean",
);

define_static_variable!(
    VAR_CRUSTAL_CARBONATE,
    name = "Carbon Reservoir|Crustal Carbonate",
    unit = "g",
    description = "Carbonate carbon stored in the crust",
);

define_static_variable!(
    VAR_CRUSTAL_ORGANIC,
    name = "Carbon Reservoir|Crustal Organic",
    unit = "g",
    description = "Organic carbon stored in the crust",
);

define_static_variable!(
    VAR_MANTLE_CARBONATE,
    name = "Carbon Reservoir|Mantle Carbonate",
    unit = "g",
    description = "Subducted carbonate carbon residing in the mantle",
);

define_static_variable!(
    VAR_MANTLE_ORGANIC,
    name = "Carbon Reservoir|Mantle Organic",
    unit = "g",
    description = "Subducted organic carbon residing in the mantle",
);

define_static_variable!(
    VAR_PRIMORDIAL_MANTLE,
    name = "Carbon Reservoir|Primordial Mantle",
    unit = "g",
    description = "Primordial mantle carbon",
);

// ============================================================================
// Isotopic compositions
// ============================================================================

define_static_variable!(
    VAR_D13C_ATMOSPHERE_OCEAN,
    name = "Isotopic Composition|Atmosphere-Ocean",
    unit = "permil",
    description = "δ13C of atmosphere-ocean carbon",
);

define_static_variable!(
    VAR_D13C_CRUSTAL_CARBONATE,
    name = "Isotopic Composition|Crustal Carbonate",
    unit = "permil",
    description = "δ13C of marine carbonate",
);

define_static_variable!(
    VAR_D13C_CRUSTAL_ORGANIC,
    name = "Isotopic Composition|Crustal Organic",
    unit = "permil",
    description = "δ13C of organic carbon",
);

define_static_variable!(
    VAR_D13C_PRIMORDIAL_MANTLE,
    name = "Isotopic Composition|Primordial Mantle",
    unit = "permil",
    description = "δ13C of primordial mantle carbon",
);

define_static_variable!(
    VAR_D13C_ARC,
    name = "Isotopic Composition|Arc",
    unit = "permil",
    description = "δ13C of arc degassing",
);

define_static_variable!(
    VAR_D13C_OIB,
    name = "Isotopic Composition|OIB",
    unit = "permil",
    description = "δ13C of ocean-island basalt degassing",
);

define_static_variable!(
    VAR_D13C_MOR,
    name = "Isotopic Composition|MOR",
    unit = "permil",
    description = "δ13C of mid-ocean ridge degassing",
);

// ============================================================================
// Fluxes
// ============================================================================

define_static_variable!(
    VAR_ORGANIC_DEPOSITION,
    name = "Carbon Flux|Organic Deposition",
    unit = "g / Myr",
    description = "Organic carbon buried from the atmosphere-ocean",
);

define_static_variable!(
    VAR_CARBONATE_DEPOSITION,
    name = "Carbon Flux|Carbonate Deposition",
    unit = "g / Myr",
    description = "Carbonate buried from the atmosphere-ocean",
);

define_static_variable!(
    VAR_ORGANIC_SUBDUCTION,
    name = "Carbon Flux|Organic Subduction",
    unit = "g / Myr",
    description = "Newly deposited organic carbon subducted into the mantle",
);

define_static_variable!(
    VAR_CARBONATE_SUBDUCTION,
    name = "Carbon Flux|Carbonate Subduction",
    unit = "g / Myr",
    description = "Newly deposited carbonate subducted into the mantle",
);

define_static_variable!(
    VAR_MOR_FLUX,
    name = "Carbon Flux|MOR",
    unit = "g / Myr",
    description = "Mid-ocean ridge degassing",
);

define_static_variable!(
    VAR_ORGANIC_WEATHERING,
    name = "Carbon Flux|Organic Weathering",
    unit = "g / Myr",
    description = "Oxidative weathering of crustal organic carbon",
);

define_static_variable!(
    VAR_ARC_FLUX,
    name = "Carbon Flux|Arc",
    unit = "g / Myr",
    description = "Arc degassing, primordial background plus recycled slab carbon",
);

define_static_variable!(
    VAR_OIB_FLUX,
    name = "Carbon Flux|OIB",
    unit = "g / Myr",
    description = "Ocean-island basalt degassing, primordial background plus recycled slab carbon",
);

define_static_variable!(
    VAR_OIB_ORGANIC_FLUX,
    name = "Carbon Flux|OIB|Recycled Organic",
    unit = "g / Myr",
    description = "Recycled organic carbon released at ocean islands",
);

define_static_variable!(
    VAR_TOTAL_FLUX,
    name = "Carbon Flux|Total Degassing",
    unit = "g / Myr",
    description = "Sum of OIB, arc and MOR degassing",
);

// ============================================================================
// Drivers
// ============================================================================

define_static_variable!(
    VAR_WEATHERING_CONSTANT,
    name = "Driver|Weathering Constant",
    unit = "1 / Myr",
    description = "Rate constant removing carbon from the atmosphere-ocean",
);

define_static_variable!(
    VAR_ORGANIC_SUBDUCTION_EFFICIENCY,
    name = "Driver|Subduction Efficiency|Organic",
    unit = "1",
    description = "Fraction of deposited organic carbon that is subducted",
);

define_static_variable!(
    VAR_CARBONATE_SUBDUCTION_EFFICIENCY,
    name = "Driver|Subduction Efficiency|Carbonate",
    unit = "1",
    description = "Fraction of deposited carbonate that is subducted",
);

define_static_variable!(
    VAR_ORGANIC_LAG,
    name = "Driver|Organic Lag",
    unit = "Myr",
    description = "Mantle residence time of subducted organic carbon",
);

// ============================================================================
// Diagnostics
// ============================================================================

define_static_variable!(
    VAR_ORGANIC_CARBON_MOLES,
    name = "Diagnostic|Organic Carbon",
    unit = "mol",
    description = "Organic carbon in crustal and subducted mantle reservoirs",
);

define_static_variable!(
    VAR_OXYGEN_MASS,
    name = "Diagnostic|Oxygen Mass",
    unit = "g",
    description = "O2 released by burial of the stored organic carbon",
);

define_static_variable!(
    VAR_OXYGEN_PAL,
    name = "Diagnostic|Oxygen",
    unit = "PAL",
    description = "Released O2 relative to the present atmospheric level",
);

/// Every variable a run produces, in output order
pub const ALL_VARIABLES: &[VariableDefinition] = &[
    VAR_ATMOSPHERE_OCEAN,
    VAR_CRUSTAL_CARBONATE,
    VAR_CRUSTAL_ORGANIC,
    VAR_MANTLE_CARBONATE,
    VAR_MANTLE_ORGANIC,
    VAR_PRIMORDIAL_MANTLE,
    VAR_D13C_ATMOSPHERE_OCEAN,
    VAR_D13C_CRUSTAL_CARBONATE,
    VAR_D13C_CRUSTAL_ORGANIC,
    VAR_D13C_PRIMORDIAL_MANTLE,
    VAR_D13C_ARC,
    VAR_D13C_OIB,
    VAR_D13C_MOR,
    VAR_ORGANIC_DEPOSITION,
    VAR_CARBONATE_DEPOSITION,
    VAR_ORGANIC_SUBDUCTION,
    VAR_CARBONATE_SUBDUCTION,
    VAR_MOR_FLUX,
    VAR_ORGANIC_WEATHERING,
    VAR_ARC_FLUX,
    VAR_OIB_FLUX,
    VAR_OIB_ORGANIC_FLUX,
    VAR_TOTAL_FLUX,
    VAR_WEATHERING_CONSTANT,
    VAR_ORGANIC_SUBDUCTION_EFFICIENCY,
    VAR_CARBONATE_SUBDUCTION_EFFICIENCY,
    VAR_ORGANIC_LAG,
    VAR_ORGANIC_CARBON_MOLES,
    VAR_OXYGEN_MASS,
    VAR_OXYGEN_PAL,
];

/// Look up a standard variable by name
pub fn find_variable(name: &str) -> Option<&'static VariableDefinition> {
    ALL_VARIABLES.iter().find(|var| var.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = ALL_VARIABLES.iter().map(|var| var.name).collect();
        assert_eq!(names.len(), ALL_VARIABLES.len());
    }

    #[test]
    fn lookup() {
        assert_eq!(
            find_variable("Isotopic Composition|OIB"),
            Some(&VAR_D13C_OIB)
        );
        assert!(find_variable("Emissions|CO2").is_none());
    }
}
