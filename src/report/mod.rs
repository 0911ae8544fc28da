//! Reporting utilities: result card, acknowledgement, and read-back table.

pub mod format;

pub use format::*;
