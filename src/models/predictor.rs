//! The seam between the form and whatever model was trained offline.

use crate::domain::FeatureRecord;
use crate::error::AppError;

/// A pre-trained model mapping feature rows to age estimates (years).
///
/// Implementations are loaded once and shared read-only for the life of the
/// process, so `predict` takes `&self`.
pub trait Predictor: Send + Sync {
    /// Short human-readable model name (shown in the header).
    fn name(&self) -> &str;

    /// Predict one value per input row.
    fn predict(&self, rows: &[FeatureRecord]) -> Result<Vec<f64>, AppError>;
}
