//! Input/output helpers.
//!
//! - model artifact loading (`artifact`)
//! - branding image assets (`assets`)
//! - prediction export (`export`)

pub mod artifact;
pub mod assets;
pub mod export;

pub use artifact::*;
pub use assets::*;
pub use export::*;
