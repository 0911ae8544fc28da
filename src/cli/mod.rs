//! Command-line parsing for the fossil age predictor.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! form and the predictor adapter.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::domain::{GeologicalPeriod, PaleomagneticData, StratigraphicPosition, Theme};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fossil", version, about = "Fossil Age Prediction (Huber regression)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive prediction form.
    Tui(TuiArgs),
    /// Predict once from flags and print the result (no terminal UI).
    Predict(PredictArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Model artifact (JSON). Falls back to FOSSIL_MODEL_PATH, then `model_huber.json`.
    #[arg(long, value_name = "JSON")]
    pub model: Option<PathBuf>,

    /// Append logs to this file. Falls back to FOSSIL_LOG_FILE.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory holding the branding images.
    #[arg(long, value_name = "DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Header image, relative to the assets directory.
    #[arg(long, value_name = "FILE")]
    pub header_image: Option<PathBuf>,

    /// Divider image shown above the predict section, relative to the assets directory.
    #[arg(long, value_name = "FILE")]
    pub divider_image: Option<PathBuf>,

    /// Initial theme.
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,
}

/// Inputs for a one-shot prediction. Defaults match the form's initial state.
#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Uranium-lead ratio [0.000241, 1.533270].
    #[arg(long, default_value_t = 0.000241)]
    pub uranium_lead_ratio: f64,

    /// Carbon-14 ratio [0.000244, 1.0].
    #[arg(long = "carbon-14-ratio", default_value_t = 0.000244)]
    pub carbon_14_ratio: f64,

    /// Radioactive decay series [0.000076, 1.513325].
    #[arg(long, default_value_t = 0.000076)]
    pub radioactive_decay_series: f64,

    /// Stratigraphic layer depth [0.13, 494.2].
    #[arg(long, default_value_t = 0.13)]
    pub stratigraphic_layer_depth: f64,

    #[arg(long, value_enum, default_value_t = GeologicalPeriod::Cretaceous)]
    pub geological_period: GeologicalPeriod,

    #[arg(long, value_enum, default_value_t = StratigraphicPosition::Middle)]
    pub stratigraphic_position: StratigraphicPosition,

    #[arg(long, value_enum, default_value_t = PaleomagneticData::NormalPolarity)]
    pub paleomagnetic_data: PaleomagneticData,

    /// Fossil size [0.13, 216.39].
    #[arg(long, default_value_t = 0.13)]
    pub fossil_size: f64,

    /// Also write the prediction to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

impl From<&TuiArgs> for ConfigOverrides {
    fn from(args: &TuiArgs) -> Self {
        Self {
            model: args.common.model.clone(),
            assets_dir: args.assets_dir.clone(),
            header_image: args.header_image.clone(),
            divider_image: args.divider_image.clone(),
            theme: args.theme,
            log_file: args.common.log_file.clone(),
        }
    }
}

impl From<&PredictArgs> for ConfigOverrides {
    fn from(args: &PredictArgs) -> Self {
        Self {
            model: args.common.model.clone(),
            log_file: args.common.log_file.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_flags_parse() {
        let cli = Cli::parse_from([
            "fossil",
            "predict",
            "--uranium-lead-ratio",
            "0.5",
            "--carbon-14-ratio",
            "0.5",
            "--geological-period",
            "jurassic",
            "--paleomagnetic-data",
            "reversed-polarity",
            "--stratigraphic-position",
            "bottom",
        ]);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.uranium_lead_ratio, 0.5);
        assert_eq!(args.carbon_14_ratio, 0.5);
        assert_eq!(args.geological_period, GeologicalPeriod::Jurassic);
        assert_eq!(args.paleomagnetic_data, PaleomagneticData::ReversedPolarity);
        assert_eq!(args.stratigraphic_position, StratigraphicPosition::Bottom);
        assert_eq!(args.fossil_size, 0.13);
    }

    #[test]
    fn tui_theme_flag_parses() {
        let cli = Cli::parse_from(["fossil", "tui", "--theme", "light-blue"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.theme, Some(Theme::LightBlue));
    }

    #[test]
    fn unknown_period_is_rejected() {
        let args = ["fossil", "predict", "--geological-period", "eocene"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
