//! Predictor abstraction and the Huber-regression adapter.
//!
//! The form only ever talks to `dyn Predictor`; `HuberModel` is the one
//! concrete implementation, built from a JSON artifact.

pub mod huber;
pub mod predictor;

pub use huber::*;
pub use predictor::*;
