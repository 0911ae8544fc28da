//! Mathematical utilities for evaluating linear models.

pub mod linear;

pub use linear::*;
