//! Linear evaluation helpers.
//!
//! A fitted linear pipeline evaluates as:
//!
//! ```text
//! y = intercept + β · x
//! ```
//!
//! where `x` is the design row: standardized numeric columns followed by
//! one-hot indicators for each categorical level.

use nalgebra::DVector;

/// Standardize a raw value as `(x - center) / scale`.
///
/// Callers guarantee `scale != 0`; the artifact loader rejects zero scales.
pub fn standardize(x: f64, center: f64, scale: f64) -> f64 {
    (x - center) / scale
}

/// Evaluate `intercept + β · x`.
///
/// Returns `None` on a dimension mismatch or a non-finite result.
pub fn evaluate(intercept: f64, coefs: &DVector<f64>, row: &DVector<f64>) -> Option<f64> {
    if coefs.len() != row.len() {
        return None;
    }
    let y = intercept + coefs.dot(row);
    y.is_finite().then_some(y)
}
