//! Read the serialized model artifact.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::AppError;
use crate::models::{HuberArtifact, HuberModel};

/// Load a Huber pipeline from a JSON artifact.
///
/// Any failure here is a startup failure: there is no fallback model.
pub fn load_model(path: &Path) -> Result<HuberModel, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::startup(format!("Failed to open model artifact '{}': {e}", path.display()))
    })?;
    let artifact: HuberArtifact = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AppError::startup(format!("Invalid model artifact '{}': {e}", path.display()))
    })?;
    let model = HuberModel::from_artifact(artifact)?;

    tracing::info!(
        path = %path.display(),
        estimator = %model.artifact().estimator,
        columns = model.artifact().columns.len(),
        "model artifact loaded"
    );
    Ok(model)
}
