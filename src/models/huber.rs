//! Huber-regression pipeline evaluated from a JSON artifact.
//!
//! The artifact carries the fitted linear coefficients plus the preprocessing
//! that produced the design matrix (standardization for numeric columns,
//! one-hot levels for categorical columns). Robust fitting happened offline;
//! at inference time a Huber regressor is an ordinary linear model.
//!
//! Loading only checks the artifact is numerically sane. Whether its columns
//! line up with `FeatureRecord` is checked on every `predict`, so a schema
//! mismatch fails the prediction rather than startup.

use std::collections::BTreeMap;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::domain::{FeatureRecord, FeatureValue};
use crate::error::AppError;
use crate::math::{evaluate, standardize};
use crate::models::Predictor;

fn default_epsilon() -> f64 {
    1.35
}

/// On-disk schema of a fitted pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuberArtifact {
    pub estimator: String,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Input columns, in the order the pipeline was fitted on.
    pub columns: Vec<String>,
    pub intercept: f64,
    #[serde(default)]
    pub numeric: Vec<NumericTerm>,
    #[serde(default)]
    pub categorical: Vec<CategoricalTerm>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTerm {
    pub name: String,
    #[serde(default)]
    pub center: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
    pub coef: f64,
}

fn unit_scale() -> f64 {
    1.0
}

/// One-hot coefficients keyed by category label.
///
/// A level missing from `levels` is unknown to the model and fails prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTerm {
    pub name: String,
    pub levels: BTreeMap<String, f64>,
}

/// A loaded, immutable Huber pipeline.
#[derive(Debug, Clone)]
pub struct HuberModel {
    artifact: HuberArtifact,
    display_name: String,
    coefs: DVector<f64>,
}

impl HuberModel {
    pub fn from_artifact(artifact: HuberArtifact) -> Result<Self, AppError> {
        if !artifact.intercept.is_finite() {
            return Err(AppError::startup("Model artifact has a non-finite intercept."));
        }
        if artifact.columns.is_empty() {
            return Err(AppError::startup("Model artifact lists no input columns."));
        }
        for term in &artifact.numeric {
            if !(term.center.is_finite() && term.coef.is_finite()) {
                return Err(AppError::startup(format!(
                    "Model artifact term '{}' is not finite.",
                    term.name
                )));
            }
            if !term.scale.is_finite() || term.scale == 0.0 {
                return Err(AppError::startup(format!(
                    "Model artifact term '{}' has an invalid scale ({}).",
                    term.name, term.scale
                )));
            }
        }
        for term in &artifact.categorical {
            if term.levels.is_empty() {
                return Err(AppError::startup(format!(
                    "Model artifact term '{}' has no levels.",
                    term.name
                )));
            }
            if term.levels.values().any(|c| !c.is_finite()) {
                return Err(AppError::startup(format!(
                    "Model artifact term '{}' has a non-finite level coefficient.",
                    term.name
                )));
            }
        }

        let mut coefs = Vec::new();
        coefs.extend(artifact.numeric.iter().map(|t| t.coef));
        for term in &artifact.categorical {
            coefs.extend(term.levels.values().copied());
        }

        let display_name = format!("{} (epsilon={})", artifact.estimator, artifact.epsilon);

        Ok(Self {
            artifact,
            display_name,
            coefs: DVector::from_vec(coefs),
        })
    }

    pub fn artifact(&self) -> &HuberArtifact {
        &self.artifact
    }

    /// The artifact's columns must be exactly the record's columns, and each
    /// must be covered by one coefficient block of the right kind.
    fn check_schema(&self) -> Result<(), AppError> {
        let expected: Vec<&str> = FeatureRecord::COLUMNS.to_vec();
        let actual: Vec<&str> = self.artifact.columns.iter().map(String::as_str).collect();
        if actual != expected {
            return Err(AppError::inference(format!(
                "column mismatch: model expects [{}], form provides [{}]",
                actual.join(", "),
                expected.join(", ")
            )));
        }

        for column in FeatureRecord::COLUMNS {
            let blocks = self.artifact.numeric.iter().filter(|t| t.name == column).count()
                + self
                    .artifact
                    .categorical
                    .iter()
                    .filter(|t| t.name == column)
                    .count();
            if blocks != 1 {
                return Err(AppError::inference(format!(
                    "column '{column}' has {blocks} coefficient blocks (expected 1)"
                )));
            }
        }
        Ok(())
    }

    fn design_row(&self, record: &FeatureRecord) -> Result<DVector<f64>, AppError> {
        let cells = record.cells();
        let lookup = |name: &str| {
            cells
                .iter()
                .find(|(column, _)| *column == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| AppError::inference(format!("unknown column '{name}'")))
        };

        let mut row = Vec::with_capacity(self.coefs.len());
        for term in &self.artifact.numeric {
            match lookup(&term.name)? {
                FeatureValue::Number(x) => row.push(standardize(x, term.center, term.scale)),
                FeatureValue::Category(label) => {
                    return Err(AppError::inference(format!(
                        "column '{}' is categorical ('{label}') but the model treats it as numeric",
                        term.name
                    )));
                }
            }
        }
        for term in &self.artifact.categorical {
            let label = match lookup(&term.name)? {
                FeatureValue::Category(label) => label,
                FeatureValue::Number(x) => {
                    return Err(AppError::inference(format!(
                        "column '{}' is numeric ({x}) but the model treats it as categorical",
                        term.name
                    )));
                }
            };
            if !term.levels.contains_key(label) {
                return Err(AppError::inference(format!(
                    "found unknown category '{label}' in column '{}'",
                    term.name
                )));
            }
            row.extend(term.levels.keys().map(|level| if level == label { 1.0 } else { 0.0 }));
        }

        Ok(DVector::from_vec(row))
    }
}

impl Predictor for HuberModel {
    fn name(&self) -> &str {
        &self.display_name
    }

    fn predict(&self, rows: &[FeatureRecord]) -> Result<Vec<f64>, AppError> {
        self.check_schema()?;
        rows.iter()
            .map(|record| {
                let row = self.design_row(record)?;
                evaluate(self.artifact.intercept, &self.coefs, &row)
                    .ok_or_else(|| AppError::inference("model produced a non-finite value"))
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{GeologicalPeriod, PaleomagneticData, StratigraphicPosition};

    /// Small pipeline with round numbers so expected values are easy to derive.
    pub(crate) fn sample_artifact() -> HuberArtifact {
        let numeric = [
            ("uranium_lead_ratio", 0.5, 0.25, 1000.0),
            ("carbon_14_ratio", 0.5, 0.25, -2000.0),
            ("radioactive_decay_series", 0.5, 0.25, 500.0),
            ("stratigraphic_layer_depth", 100.0, 50.0, 3000.0),
            ("fossil_size", 50.0, 25.0, 100.0),
        ]
        .into_iter()
        .map(|(name, center, scale, coef)| NumericTerm {
            name: name.to_string(),
            center,
            scale,
            coef,
        })
        .collect();

        let periods = GeologicalPeriod::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| (p.label().to_string(), i as f64 * 10.0))
            .collect();
        let polarity = PaleomagneticData::ALL
            .iter()
            .map(|p| (p.label().to_string(), 0.0))
            .collect();
        let position = [("Top", -5.0), ("Middle", 0.0), ("Bottom", 5.0)]
            .into_iter()
            .map(|(l, c)| (l.to_string(), c))
            .collect();

        HuberArtifact {
            estimator: "HuberRegressor".to_string(),
            epsilon: 1.35,
            columns: FeatureRecord::COLUMNS.iter().map(|c| c.to_string()).collect(),
            intercept: 40000.0,
            numeric,
            categorical: vec![
                CategoricalTerm {
                    name: "geological_period".to_string(),
                    levels: periods,
                },
                CategoricalTerm {
                    name: "paleomagnetic_data".to_string(),
                    levels: polarity,
                },
                CategoricalTerm {
                    name: "stratigraphic_position".to_string(),
                    levels: position,
                },
            ],
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
    fn predict_at_centers_is_intercept_plus_levels() {
        let model = HuberModel::from_artifact(sample_artifact()).unwrap();
        let out = model.predict(&[scenario_record()]).unwrap();
        // Jurassic is index 4 -> 40.0; Middle and Normal polarity -> 0.0.
        assert_eq!(out.len(), 1);
        assert!((out[0] - 40040.0).abs() < 1e-9);
    }

    #[test]
    fn numeric_terms_are_standardized() {
        let model = HuberModel::from_artifact(sample_artifact()).unwrap();
        let mut record = scenario_record();
        record.stratigraphic_layer_depth = 150.0;
        record.stratigraphic_position = StratigraphicPosition::Bottom;
        let out = model.predict(&[record]).unwrap();
        assert!((out[0] - (40040.0 + 3000.0 + 5.0)).abs() < 1e-9);
    }

    #[test]
    fn column_mismatch_fails_at_predict_not_load() {
        let mut artifact = sample_artifact();
        artifact.columns.swap(5, 6);
        let model = HuberModel::from_artifact(artifact).expect("load should not check schema");
        let err = model.predict(&[scenario_record()]).unwrap_err();
        assert!(matches!(err, AppError::Inference(_)));
        assert!(err.to_string().contains("column mismatch"));
    }

    #[test]
    fn unknown_category_fails_prediction() {
        let mut artifact = sample_artifact();
        artifact.categorical[0].levels.remove("Jurassic");
        let model = HuberModel::from_artifact(artifact).unwrap();
        let err = model.predict(&[scenario_record()]).unwrap_err();
        assert!(err.to_string().contains("unknown category 'Jurassic'"));
    }

    #[test]
    fn missing_coefficient_block_fails_prediction() {
        let mut artifact = sample_artifact();
        artifact.numeric.retain(|t| t.name != "fossil_size");
        let model = HuberModel::from_artifact(artifact).unwrap();
        assert!(model.predict(&[scenario_record()]).is_err());
    }

    #[test]
    fn zero_scale_is_rejected_at_load() {
        let mut artifact = sample_artifact();
        artifact.numeric[0].scale = 0.0;
        let err = HuberModel::from_artifact(artifact).unwrap_err();
        assert!(matches!(err, AppError::Startup(_)));
    }

    #[test]
    fn predicts_one_value_per_row() {
        let model = HuberModel::from_artifact(sample_artifact()).unwrap();
        let rows = [scenario_record(), FeatureRecord::default()];
        assert_eq!(model.predict(&rows).unwrap().len(), 2);
    }
}
