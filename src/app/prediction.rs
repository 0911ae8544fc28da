//! Shared "predict" step used by both the headless CLI and the TUI.
//!
//! Record -> predictor -> one finite value -> truncated age. The CLI and the
//! TUI only differ in how they present the resulting `PredictionReport`.

use serde::Serialize;

use crate::domain::FeatureRecord;
use crate::error::AppError;
use crate::models::Predictor;

/// Everything a successful prediction renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub model: String,
    pub record: FeatureRecord,
    /// Raw model output.
    pub prediction: f64,
    /// `prediction` truncated toward zero.
    pub age_years: i64,
}

impl PredictionReport {
    pub fn age_display(&self) -> String {
        crate::report::format_age(self.age_years)
    }
}

/// Invoke the predictor on exactly one record.
///
/// Errors are returned untouched so the caller can abort its render.
pub fn run_prediction(
    predictor: &dyn Predictor,
    record: &FeatureRecord,
) -> Result<PredictionReport, AppError> {
    record.validate()?;

    let output = predictor.predict(std::slice::from_ref(record))?;
    let prediction = match output.as_slice() {
        [value] if value.is_finite() => *value,
        [value] => {
            return Err(AppError::inference(format!(
                "model returned a non-finite value ({value})"
            )));
        }
        other => {
            return Err(AppError::inference(format!(
                "expected exactly one value, model returned {}",
                other.len()
            )));
        }
    };

    let age_years = truncate_age(prediction);
    tracing::info!(model = predictor.name(), prediction, age_years, "prediction completed");

    Ok(PredictionReport {
        model: predictor.name().to_string(),
        record: *record,
        prediction,
        age_years,
    })
}

/// Truncate toward zero (not round); `as` saturates outside the `i64` range.
pub fn truncate_age(prediction: f64) -> i64 {
    prediction.trunc() as i64
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{GeologicalPeriod, PaleomagneticData, StratigraphicPosition};

    /// Test double that records every frame it sees.
    pub(crate) struct RecordingPredictor {
        pub output: Result<Vec<f64>, String>,
        pub calls: Mutex<Vec<Vec<FeatureRecord>>>,
    }

    impl RecordingPredictor {
        pub(crate) fn returning(values: Vec<f64>) -> Self {
            Self {
                output: Ok(values),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                output: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Predictor for RecordingPredictor {
        fn name(&self) -> &str {
            "recording"
        }

        fn predict(&self, rows: &[FeatureRecord]) -> Result<Vec<f64>, AppError> {
            self.calls.lock().unwrap().push(rows.to_vec());
            self.output.clone().map_err(AppError::inference)
        }
    }

    fn scenario_record() -> FeatureRecord {
        FeatureRecord {
            uranium_lead_ratio: 0.5,
            carbon_14_ratio: 0.5,
            radioactive_decay_series: 0.5,
            stratigraphic_layer_depth: 100.0,
            geological_period: GeologicalPeriod::Jurassic,
            paleomagnetic_data: PaleomagneticData::NormalPolarity,
            stratigraphic_position: StratigraphicPosition::Middle,
            fossil_size: 50.0,
        }
    }

    #[test]
    fn scenario_passes_exact_record_and_truncates() {
        let predictor = RecordingPredictor::returning(vec![12345.987]);
        let report = run_prediction(&predictor, &scenario_record()).unwrap();

        let calls = predictor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec![scenario_record()]);
        assert_eq!(report.age_years, 12345);
        assert_eq!(report.age_display(), "12345 years old");
    }

    #[test]
    fn truncation_goes_toward_zero() {
        assert_eq!(truncate_age(99.999), 99);
        assert_eq!(truncate_age(-0.5), 0);
        assert_eq!(truncate_age(-12.7), -12);
    }

    #[test]
    fn repeated_predictions_are_stable() {
        let predictor = RecordingPredictor::returning(vec![777.7]);
        let a = run_prediction(&predictor, &scenario_record()).unwrap();
        let b = run_prediction(&predictor, &scenario_record()).unwrap();
        assert_eq!(a.age_display(), b.age_display());
        assert_eq!(predictor.call_count(), 2);
    }

    #[test]
    fn predictor_error_propagates() {
        let predictor = RecordingPredictor::failing("boom");
        let err = run_prediction(&predictor, &scenario_record()).unwrap_err();
        assert!(matches!(err, AppError::Inference(_)));
    }

    #[test]
    fn wrong_output_length_is_an_inference_error() {
        let predictor = RecordingPredictor::returning(vec![1.0, 2.0]);
        assert!(matches!(
            run_prediction(&predictor, &scenario_record()),
            Err(AppError::Inference(_))
        ));

        let predictor = RecordingPredictor::returning(vec![f64::NAN]);
        assert!(run_prediction(&predictor, &scenario_record()).is_err());
    }

    #[test]
    fn out_of_range_record_never_reaches_the_predictor() {
        let predictor = RecordingPredictor::returning(vec![1.0]);
        let mut record = scenario_record();
        record.fossil_size = 500.0;
        assert!(run_prediction(&predictor, &record).is_err());
        assert_eq!(predictor.call_count(), 0);
    }
}
