//! Plain-text summary of a finished run.

use deepcarb_core::standard_variables::{
    VariableDefinition, VAR_ATMOSPHERE_OCEAN, VAR_CRUSTAL_ORGANIC, VAR_D13C_CRUSTAL_CARBONATE,
    VAR_MANTLE_ORGANIC, VAR_OXYGEN_PAL, VAR_TOTAL_FLUX, VAR_WEATHERING_CONSTANT,
};
use deepcarb_core::timeseries::FloatValue;
use deepcarb_core::ModelOutput;

const COLUMNS: [(&str, VariableDefinition); 7] = [
    ("k", VAR_WEATHERING_CONSTANT),
    ("C atm-ocean", VAR_ATMOSPHERE_OCEAN),
    ("C org", VAR_CRUSTAL_ORGANIC),
    ("C mantle org", VAR_MANTLE_ORGANIC),
    ("F total", VAR_TOTAL_FLUX),
    ("d13C carb", VAR_D13C_CRUSTAL_CARBONATE),
    ("O2 (PAL)", VAR_OXYGEN_PAL),
];

/// Ages (Ma) of the report rows, oldest first, always ending at the youngest step
pub fn report_ages(output: &ModelOutput, every: u64) -> Vec<u64> {
    let axis = &output.time_axis;
    let oldest = axis.present() as u64;
    let youngest = oldest.saturating_sub(axis.last_step() as u64);

    let mut ages: Vec<u64> = (youngest..=oldest)
        .rev()
        .step_by(every.max(1) as usize)
        .collect();
    if ages.last() != Some(&youngest) {
        ages.push(youngest);
    }
    ages
}

/// Tabulate the headline series every `every` Myr
pub fn summary_table(output: &ModelOutput, every: u64) -> String {
    let mut table = format!("{:>8}", "Age (Ma)");
    for (label, _) in COLUMNS {
        table.push_str(&format!(" {label:>13}"));
    }
    table.push('\n');

    for age in report_ages(output, every) {
        table.push_str(&format!("{age:>8}"));
        for (_, var) in COLUMNS {
            table.push(' ');
            table.push_str(&format_cell(var, output.at_age(var.name, age as usize)));
        }
        table.push('\n');
    }
    table
}

/// Isotopes and oxygen as fixed point, masses and fluxes in scientific notation
fn format_cell(var: VariableDefinition, value: Option<FloatValue>) -> String {
    match value {
        Some(value) if var.unit == "permil" || var.unit == "PAL" => format!("{value:>13.3}"),
        Some(value) => format!("{value:>13.4e}"),
        None => format!("{:>13}", "-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepcarb_core::{run_model, CarbonCycleParameters};

    fn short_run() -> ModelOutput {
        let mut params = CarbonCycleParameters::default();
        params.time_domain.duration = 1000;
        run_model(params).unwrap()
    }

    #[test]
    fn ages_are_spaced_from_the_oldest_step() {
        let output = short_run();
        assert_eq!(
            report_ages(&output, 250),
            vec![5000, 4750, 4500, 4250, 4000]
        );
        assert_eq!(report_ages(&output, 300), vec![5000, 4700, 4400, 4100, 4000]);
    }

    #[test]
    fn table_has_a_row_per_age() {
        let output = short_run();
        let table = summary_table(&output, 500);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Age (Ma)"));
        assert!(lines[0].contains("O2 (PAL)"));
        assert!(lines[1].trim_start().starts_with("5000"));
        assert!(lines[3].trim_start().starts_with("4000"));
        // Initial crustal carbonate composition
        assert!(lines[1].contains("0.000"));
    }

    #[test]
    fn cells_are_fixed_width() {
        assert_eq!(
            format_cell(VAR_D13C_CRUSTAL_CARBONATE, Some(-1.23456)),
            format!("{:>13}", "-1.235")
        );
        assert_eq!(
            format_cell(VAR_ATMOSPHERE_OCEAN, Some(3e18)),
            format!("{:>13}", "3.0000e18")
        );
        assert_eq!(format_cell(VAR_OXYGEN_PAL, None), format!("{:>13}", "-"));
    }
}
