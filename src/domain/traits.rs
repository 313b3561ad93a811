// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The pipeline talks to its two outside collaborators through
// these traits only:
//
//   DataSource  - produces a Dataset (DelimitedLoader)
//   RunRecorder - receives metrics, artifacts and the model
//                 (LocalRunRecorder, MemoryRecorder in tests)
//
// The application layer is generic over both, so a different
// tracker backend only needs a new RunRecorder impl.

use std::path::{Path, PathBuf};

use crate::domain::dataset::Dataset;
use crate::domain::error::PipelineResult;
use crate::domain::model::RidgeModel;
use crate::domain::state::RunStatus;

// ─── DataSource ───────────────────────────────────────────────────────────────
/// Any component that can produce a numeric dataset.
pub trait DataSource {
    fn load(&self) -> PipelineResult<Dataset>;
}

// ─── RunRecorder ──────────────────────────────────────────────────────────────
/// Experiment tracker for one run.
///
/// `log_metric`, `log_artifact` and `save_model` are the whole
/// contract the pipeline relies on. `start_run` / `end_run` are
/// driven by `RunContext` and default to no-ops for trackers
/// without a run lifecycle.
pub trait RunRecorder {
    /// Open a run and return its identifier.
    fn start_run(&mut self) -> PipelineResult<String> {
        Ok(String::from("default"))
    }

    /// Close the current run with a final status.
    fn end_run(&mut self, _status: RunStatus) -> PipelineResult<()> {
        Ok(())
    }

    fn log_metric(&mut self, name: &str, value: f64) -> PipelineResult<()>;

    fn log_artifact(&mut self, path: &Path) -> PipelineResult<()>;

    /// Persist `model` under `destination` and return the model file path.
    fn save_model(&mut self, model: &RidgeModel, destination: &Path) -> PipelineResult<PathBuf>;
}
