// ============================================================
// Layer 6: Model Store
// ============================================================
// Persists a fitted RidgeModel to an output directory.
//
// What gets written:
//   1. model.json       - coefficients, intercept, alpha
//   2. model_meta.json  - flavour, feature count, creation time
//
// File layout:
//   outputs/
//     model.json
//     model_meta.json
//
// Reference: Rust Book §9 (Error Handling)

use std::{
    fs,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::model::RidgeModel;

pub const MODEL_FILE: &str = "model.json";
pub const META_FILE:  &str = "model_meta.json";

/// Descriptor written next to the model so a reader knows how to load it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub flavor:        String,
    pub version:       String,
    pub feature_count: usize,
    pub alpha:         f64,
    pub created_at:    String,
    pub model_file:    String,
}

pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write the model and its descriptor; returns the model file path.
    /// Creates the directory if needed and overwrites earlier files.
    pub fn save(&self, model: &RidgeModel) -> PipelineResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| PipelineError::io(&self.dir, e))?;

        let model_path = self.dir.join(MODEL_FILE);
        write_json(&model_path, model)?;

        let meta = ModelMeta {
            flavor:        "ridge_regression".to_string(),
            version:       env!("CARGO_PKG_VERSION").to_string(),
            feature_count: model.feature_count(),
            alpha:         model.alpha,
            created_at:    chrono::Local::now().to_rfc3339(),
            model_file:    MODEL_FILE.to_string(),
        };
        write_json(&self.dir.join(META_FILE), &meta)?;

        tracing::info!("Saved model to '{}'", model_path.display());
        Ok(model_path)
    }

    pub fn load(&self) -> PipelineResult<RidgeModel> {
        read_json(&self.dir.join(MODEL_FILE))
    }

    pub fn load_meta(&self) -> PipelineResult<ModelMeta> {
        read_json(&self.dir.join(META_FILE))
    }
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> PipelineResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| PipelineError::io(path, e))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> PipelineResult<T> {
    let json = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}
