//! Advisory remediation messages for out-of-range parameters.
//!
//! Checks run in a fixed order so the output is deterministic for a given
//! sample. The chlorine advisory at 4 mg/L is independent of the 5 mg/L
//! hard gate in `rules`.

use crate::schema::Sample;
use crate::verdict::Status;

/// Generate remediation guidance for a sample.
///
/// Each check yields at most one message. If the final status is Unsafe
/// and no check produced anything, a generic fallback message is appended
/// so an Unsafe verdict always carries at least one recommendation.
pub fn generate(sample: &Sample, status: Status) -> Vec<String> {
    let mut messages = Vec::new();

    if sample.ph < 6.5 {
        messages.push(format!(
            "pH ({}) is below the safe range (6.5-8.5). Consider a neutralizing filter.",
            sample.ph
        ));
    } else if sample.ph > 8.5 {
        messages.push(format!(
            "pH ({}) is above the safe range (6.5-8.5). Consider acid dosing.",
            sample.ph
        ));
    }

    if sample.turbidity > 5.0 {
        messages.push(format!(
            "Turbidity ({} NTU) is high (> 5 NTU). Consider filtration.",
            sample.turbidity
        ));
    }

    if sample.temperature > 30.0 {
        messages.push(format!(
            "Temperature ({} C) is high (> 30 C). Warm water promotes microbial growth.",
            sample.temperature
        ));
    }

    if sample.chlorine > 4.0 {
        messages.push(format!(
            "Chlorine level ({} mg/L) is high (> 4 mg/L). Check the disinfection process.",
            sample.chlorine
        ));
    }

    if sample.total_dissolved_solids > 500.0 {
        messages.push(format!(
            "Total dissolved solids ({} mg/L) exceed 500 mg/L. Consider reverse osmosis.",
            sample.total_dissolved_solids
        ));
    }

    if sample.conductivity > 1000.0 {
        messages.push(format!(
            "Conductivity ({} uS/cm) is high (> 1000 uS/cm). Dissolved ion load is elevated.",
            sample.conductivity
        ));
    }

    if sample.dissolved_oxygen < 5.0 {
        messages.push(format!(
            "Dissolved oxygen ({} mg/L) is low (< 5 mg/L). Aeration is recommended.",
            sample.dissolved_oxygen
        ));
    }

    if sample.salinity > 1.0 {
        messages.push(format!(
            "Salinity ({} ppt) is high (> 1 ppt). Desalination may be required.",
            sample.salinity
        ));
    }

    if sample.hardness > 300.0 {
        messages.push(format!(
            "Hardness ({} mg/L) is high (> 300 mg/L). Consider a water softener.",
            sample.hardness
        ));
    }

    if sample.alkalinity < 20.0 {
        messages.push(format!(
            "Alkalinity ({} mg/L) is low (< 20 mg/L). Buffering capacity is poor.",
            sample.alkalinity
        ));
    } else if sample.alkalinity > 200.0 {
        messages.push(format!(
            "Alkalinity ({} mg/L) is high (> 200 mg/L). Scaling and taste issues are likely.",
            sample.alkalinity
        ));
    }

    if sample.total_coliforms > 0.0 {
        messages.push(format!(
            "Total coliforms detected ({} CFU/100 mL). Disinfect before drinking.",
            sample.total_coliforms
        ));
    }

    if sample.e_coli > 0.0 {
        messages.push(format!(
            "E. coli detected ({} CFU/100 mL). Water is unsafe without treatment.",
            sample.e_coli
        ));
    }

    if messages.is_empty() && status == Status::Unsafe {
        messages.push(
            "Water failed the safety assessment. Full laboratory analysis and treatment are \
             recommended before use."
                .to_string(),
        );
    }

    messages
}
