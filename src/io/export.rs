//! Export a prediction to JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::app::prediction::PredictionReport;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct ExportedPrediction<'a> {
    tool: &'static str,
    predicted_at: DateTime<Local>,
    #[serde(flatten)]
    report: &'a PredictionReport,
    display: String,
}

/// Write the prediction (inputs included) as pretty JSON.
pub fn write_prediction_json(path: &Path, report: &PredictionReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export '{}'", path.display()), e))?;

    let doc = ExportedPrediction {
        tool: "fossil",
        predicted_at: Local::now(),
        report,
        display: report.age_display(),
    };
    serde_json::to_writer_pretty(file, &doc).map_err(|e| {
        AppError::io(format!("Failed to write export '{}'", path.display()), e.into())
    })?;

    tracing::info!(path = %path.display(), "prediction exported");
    Ok(())
}
