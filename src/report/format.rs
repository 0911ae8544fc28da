//! Formatted terminal output for the headless `predict` command.
//!
//! The TUI renders the same pieces as widgets; the strings live here so the
//! wording stays in one place.

use crate::app::prediction::PredictionReport;
use crate::domain::{FeatureRecord, FeatureValue};

pub const APP_TITLE: &str = "Fossil Age Prediction";
pub const RESULT_TITLE: &str = "Predicted Fossil Age";
pub const SUCCESS_MESSAGE: &str = "Prediction successfully completed!";
pub const SUMMARY_TITLE: &str = "Fossil Analysis Summary";
pub const SUMMARY_INTRO: &str = "Here is a summary of the input data used for the prediction:";
pub const FOOTER: &str = "Powered by FossilAI | All rights reserved 2024";

/// `"<age> years old"`.
pub fn format_age(age_years: i64) -> String {
    format!("{age_years} years old")
}

/// Full headless output: result card, acknowledgement, then the read-back table.
pub fn format_prediction(report: &PredictionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {RESULT_TITLE} ===\n"));
    out.push_str(&report.age_display());
    out.push_str("\n\n");
    out.push_str(SUCCESS_MESSAGE);
    out.push_str("\n\n");
    out.push_str(&format!("{SUMMARY_TITLE}\n"));
    out.push_str(SUMMARY_INTRO);
    out.push('\n');
    out.push_str(&format_summary_table(&report.record));

    out
}

/// Two-row table: column names, then the submitted values.
pub fn format_summary_table(record: &FeatureRecord) -> String {
    let cells = record.cells();
    let values: Vec<String> = cells.iter().map(|(_, v)| format_cell(*v)).collect();
    let widths: Vec<usize> = cells
        .iter()
        .zip(&values)
        .map(|((name, _), value)| name.len().max(value.len()))
        .collect();

    let mut header = String::new();
    let mut rule = String::new();
    let mut row = String::new();
    for (i, ((name, _), value)) in cells.iter().zip(&values).enumerate() {
        let w = widths[i];
        header.push_str(&format!("{name:<w$} "));
        rule.push_str(&format!("{:-<w$} ", ""));
        row.push_str(&format!("{value:<w$} "));
    }

    let mut out = String::new();
    for line in [header, rule, row] {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Numbers as the model saw them (shortest round-trip form), labels verbatim.
pub fn format_cell(value: FeatureValue) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeologicalPeriod, PaleomagneticData, StratigraphicPosition};

    fn report() -> PredictionReport {
        PredictionReport {
            model: "test".to_string(),
            record: FeatureRecord {
                uranium_lead_ratio: 0.5,
                carbon_14_ratio: 0.5,
                radioactive_decay_series: 0.5,
                stratigraphic_layer_depth: 100.0,
                geological_period: GeologicalPeriod::Jurassic,
                paleomagnetic_data: PaleomagneticData::NormalPolarity,
                stratigraphic_position: StratigraphicPosition::Middle,
                fossil_size: 50.0,
            },
            prediction: 40040.9,
            age_years: 40040,
        }
    }

    #[test]
    fn age_suffix() {
        assert_eq!(format_age(0), "0 years old");
        assert_eq!(format_age(-3), "-3 years old");
    }

    #[test]
    fn prediction_output_orders_card_ack_and_table() {
        let text = format_prediction(&report());
        let card = text.find("40040 years old").unwrap();
        let ack = text.find(SUCCESS_MESSAGE).unwrap();
        let table = text.find("geological_period").unwrap();
        assert!(card < ack && ack < table);
    }

    #[test]
    fn summary_table_reads_back_every_column() {
        let table = format_summary_table(&report().record);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        for column in FeatureRecord::COLUMNS {
            assert!(lines[0].contains(column), "missing {column}");
        }
        assert!(lines[2].contains("Jurassic"));
        assert!(lines[2].contains("Normal polarity"));
        assert!(lines[2].contains("100"));
    }
}
