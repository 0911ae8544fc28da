//! Runtime configuration.
//!
//! Each setting resolves as: CLI flag, then environment (after loading `.env`),
//! then the built-in default.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::domain::Theme;
use crate::error::AppError;

pub const ENV_MODEL_PATH: &str = "FOSSIL_MODEL_PATH";
pub const ENV_ASSETS_DIR: &str = "FOSSIL_ASSETS_DIR";
pub const ENV_HEADER_IMAGE: &str = "FOSSIL_HEADER_IMAGE";
pub const ENV_DIVIDER_IMAGE: &str = "FOSSIL_DIVIDER_IMAGE";
pub const ENV_THEME: &str = "FOSSIL_THEME";
pub const ENV_LOG_FILE: &str = "FOSSIL_LOG_FILE";

const DEFAULT_MODEL_PATH: &str = "model_huber.json";
const DEFAULT_ASSETS_DIR: &str = "assets";
const DEFAULT_HEADER_IMAGE: &str = "fossil_header.png";
const DEFAULT_DIVIDER_IMAGE: &str = "divider.png";

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub header_image: Option<PathBuf>,
    pub divider_image: Option<PathBuf>,
    pub theme: Option<Theme>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub header_image: PathBuf,
    pub divider_image: PathBuf,
    pub theme: Theme,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve against the process environment, loading `.env` first if present.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Like [`AppConfig::from_env`], but `FOSSIL_THEME` is never consulted.
    pub fn from_env_headless(overrides: ConfigOverrides) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::resolve_headless(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve for the headless command, which draws nothing and so has no theme.
    pub fn resolve_headless<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::resolve(overrides, |key| {
            if key == ENV_THEME { None } else { lookup(key) }
        })
    }

    /// Resolve against an arbitrary variable lookup.
    pub fn resolve<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_path = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        let model_path = overrides
            .model
            .or_else(|| env_path(ENV_MODEL_PATH))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let assets_dir = overrides
            .assets_dir
            .or_else(|| env_path(ENV_ASSETS_DIR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));
        let header_image = assets_dir.join(
            overrides
                .header_image
                .or_else(|| env_path(ENV_HEADER_IMAGE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HEADER_IMAGE)),
        );
        let divider_image = assets_dir.join(
            overrides
                .divider_image
                .or_else(|| env_path(ENV_DIVIDER_IMAGE))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DIVIDER_IMAGE)),
        );

        let theme = match overrides.theme {
            Some(theme) => theme,
            None => match lookup(ENV_THEME).filter(|v| !v.trim().is_empty()) {
                Some(raw) => Theme::from_str(raw.trim(), true).map_err(|_| {
                    AppError::config(format!(
                        "Invalid {ENV_THEME} '{raw}' (expected default, dark, or light-blue)."
                    ))
                })?,
                None => Theme::default(),
            },
        };

        let log_file = overrides.log_file.or_else(|| env_path(ENV_LOG_FILE));

        Ok(Self {
            model_path,
            header_image,
            divider_image,
            theme,
            log_file,
        })
    }
}
