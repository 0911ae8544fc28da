//! Static branding images shown above the form and before the predict section.
//!
//! The terminal cannot draw the pixels, but the files are still required:
//! a missing or empty image is a startup failure, exactly like a missing model.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// A branding image read fully into memory at startup.
#[derive(Debug, Clone)]
pub struct BrandingImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl BrandingImage {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if path.is_dir() {
            return Err(AppError::startup(format!(
                "Expected an image file, got a directory: {}",
                path.display()
            )));
        }
        let bytes = fs::read(path).map_err(|e| {
            AppError::startup(format!("Failed to load image asset '{}': {e}", path.display()))
        })?;
        if bytes.is_empty() {
            return Err(AppError::startup(format!(
                "Image asset is empty: {}",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string()
    }
}

/// Header image + section divider image.
#[derive(Debug, Clone)]
pub struct Assets {
    pub header: BrandingImage,
    pub divider: BrandingImage,
}

impl Assets {
    pub fn load(header: &Path, divider: &Path) -> Result<Self, AppError> {
        let assets = Self {
            header: BrandingImage::load(header)?,
            divider: BrandingImage::load(divider)?,
        };
        tracing::info!(
            header = %assets.header.path.display(),
            divider = %assets.divider.path.display(),
            "branding assets loaded"
        );
        Ok(assets)
    }
}
