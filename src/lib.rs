//! `fossil-age` library crate.
//!
//! The binary (`fossil`) is a thin wrapper around this library so that:
//!
//! - the form controller is testable without a terminal
//! - the predictor adapter can be reused outside the TUI

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod report;
pub mod tui;
