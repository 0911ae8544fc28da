//! Domain types used throughout the form and predictor adapter.
//!
//! This module defines:
//!
//! - the categorical inputs and slider bounds
//! - the one-row `FeatureRecord`
//! - the cosmetic `Theme`

pub mod types;

pub use types::*;
