//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves configuration
//! - loads the model artifact (and, for the form, the branding assets)
//! - runs either the interactive form or a one-shot prediction

use std::sync::Arc;

use clap::Parser;

use crate::cli::{Command, PredictArgs, TuiArgs};
use crate::config::{AppConfig, ConfigOverrides};
use crate::domain::{FeatureRecord, NumericField};
use crate::error::AppError;
use crate::io::Assets;
use crate::models::Predictor;

pub mod prediction;

/// Entry point for the `fossil` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Predict(args) => handle_predict(args),
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let config = AppConfig::from_env(ConfigOverrides::from(&args))?;
    if let Some(path) = &config.log_file {
        crate::logging::init_file(path)?;
    }

    // Model and both images must be present before the form is shown.
    let predictor: Arc<dyn Predictor> = Arc::new(crate::io::load_model(&config.model_path)?);
    let assets = Assets::load(&config.header_image, &config.divider_image)?;

    crate::tui::run(predictor, assets, config.theme)
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::from_env_headless(ConfigOverrides::from(&args))?;
    match &config.log_file {
        Some(path) => crate::logging::init_file(path)?,
        None => crate::logging::init_stderr(),
    }

    let record = record_from_args(&args)?;
    let model = crate::io::load_model(&config.model_path)?;

    // Nothing is printed until the prediction has succeeded.
    let report = prediction::run_prediction(&model, &record)?;
    println!("{}", crate::report::format_prediction(&report));

    if let Some(path) = &args.export {
        crate::io::write_prediction_json(path, &report)?;
    }
    Ok(())
}

/// Build the record a form with these control values would submit.
pub fn record_from_args(args: &PredictArgs) -> Result<FeatureRecord, AppError> {
    Ok(FeatureRecord {
        uranium_lead_ratio: NumericField::UraniumLeadRatio.validate(args.uranium_lead_ratio)?,
        carbon_14_ratio: NumericField::Carbon14Ratio.validate(args.carbon_14_ratio)?,
        radioactive_decay_series: NumericField::RadioactiveDecaySeries
            .validate(args.radioactive_decay_series)?,
        stratigraphic_layer_depth: NumericField::StratigraphicLayerDepth
            .validate(args.stratigraphic_layer_depth)?,
        geological_period: args.geological_period,
        paleomagnetic_data: args.paleomagnetic_data,
        stratigraphic_position: args.stratigraphic_position,
        fossil_size: NumericField::FossilSize.validate(args.fossil_size)?,
    })
}

/// Rewrite argv so `fossil` defaults to `fossil tui`.
///
/// Rules:
/// - `fossil`                          -> `fossil tui`
/// - `fossil --theme dark ...`         -> `fossil tui --theme dark ...`
/// - `fossil --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if matches!(arg1.as_str(), "tui" | "predict") {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_the_form() {
        assert_eq!(rewrite_args(argv(&["fossil"])), argv(&["fossil", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["fossil", "--theme", "dark"])),
            argv(&["fossil", "tui", "--theme", "dark"])
        );
        assert_eq!(rewrite_args(argv(&["fossil", "--help"])), argv(&["fossil", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["fossil", "predict"])),
            argv(&["fossil", "predict"])
        );
    }

    fn predict_args(extra: &[&str]) -> PredictArgs {
        let mut all = vec!["fossil", "predict"];
        all.extend_from_slice(extra);
        match Cli::parse_from(all).command {
            Command::Predict(args) => args,
            Command::Tui(_) => panic!("expected predict"),
        }
    }

    #[test]
    fn record_from_args_keeps_values() {
        let record = record_from_args(&predict_args(&[
            "--uranium-lead-ratio",
            "0.5",
            "--stratigraphic-layer-depth",
            "100",
            "--fossil-size",
            "50",
            "--geological-period",
            "jurassic",
        ]))
        .unwrap();
        assert_eq!(record.uranium_lead_ratio, 0.5);
        assert_eq!(record.stratigraphic_layer_depth, 100.0);
        assert_eq!(record.fossil_size, 50.0);
        assert_eq!(record.geological_period, crate::domain::GeologicalPeriod::Jurassic);
    }

    #[test]
    fn record_from_args_rejects_out_of_range() {
        let err = record_from_args(&predict_args(&["--fossil-size", "300"])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn default_args_match_the_form_defaults() {
        let record = record_from_args(&predict_args(&[])).unwrap();
        assert_eq!(record, FeatureRecord::default());
    }
}
