// ============================================================
// Layer 6: Local Run Recorder
// ============================================================
// File-backed experiment tracker implementing RunRecorder.
//
// Layout under the tracking directory:
//
//   runs/
//     20261018_142501_3fa9c1/     ← one directory per run
//       meta.json                 ← run id, start/end time, status
//       config.json               ← parameters the run was started with
//       metrics.csv               ← every log_metric call
//       artifacts/
//         actuals_vs_predictions.png
//
// save_model() writes to the caller's destination (the model
// output directory), not into the run directory.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::model::RidgeModel;
use crate::domain::state::RunStatus;
use crate::domain::traits::RunRecorder;
use crate::infra::metrics::{MetricRecord, MetricsLogger};
use crate::infra::model_store::{write_json, ModelStore};

pub const META_FILE:     &str = "meta.json";
pub const CONFIG_FILE:   &str = "config.json";
pub const ARTIFACTS_DIR: &str = "artifacts";

/// Contents of meta.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id:     String,
    pub start_time: String,
    pub end_time:   Option<String>,
    pub status:     RunStatus,
}

struct ActiveRun {
    dir:     PathBuf,
    meta:    RunMeta,
    metrics: MetricsLogger,
    steps:   HashMap<String, u64>,
}

pub struct LocalRunRecorder {
    tracking_dir: PathBuf,
    params:       Option<serde_json::Value>,
    active:       Option<ActiveRun>,
    last_run_dir: Option<PathBuf>,
}

impl LocalRunRecorder {
    pub fn new(tracking_dir: impl Into<PathBuf>) -> Self {
        Self {
            tracking_dir: tracking_dir.into(),
            params:       None,
            active:       None,
            last_run_dir: None,
        }
    }

    /// Parameters written to config.json when the run starts.
    pub fn with_params<T: Serialize>(mut self, params: &T) -> PipelineResult<Self> {
        self.params = Some(serde_json::to_value(params)?);
        Ok(self)
    }

    /// Directory of the active run, or of the last closed one.
    pub fn run_dir(&self) -> Option<&Path> {
        self.active
            .as_ref()
            .map(|r| r.dir.as_path())
            .or(self.last_run_dir.as_deref())
    }

    fn active(&mut self) -> PipelineResult<&mut ActiveRun> {
        self.active
            .as_mut()
            .ok_or_else(|| PipelineError::Recorder("no active run".into()))
    }
}

impl RunRecorder for LocalRunRecorder {
    fn start_run(&mut self) -> PipelineResult<String> {
        if let Some(run) = &self.active {
            return Err(PipelineError::Recorder(format!(
                "run '{}' is still active",
                run.meta.run_id
            )));
        }

        let run_id = new_run_id();
        let dir    = self.tracking_dir.join(&run_id);
        fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;

        let meta = RunMeta {
            run_id:     run_id.clone(),
            start_time: chrono::Local::now().to_rfc3339(),
            end_time:   None,
            status:     RunStatus::Running,
        };
        write_json(&dir.join(META_FILE), &meta)?;

        if let Some(params) = &self.params {
            write_json(&dir.join(CONFIG_FILE), params)?;
        }

        let metrics = MetricsLogger::new(&dir)?;
        tracing::info!("Started run '{}' in '{}'", run_id, dir.display());

        self.active = Some(ActiveRun { dir, meta, metrics, steps: HashMap::new() });
        Ok(run_id)
    }

    fn end_run(&mut self, status: RunStatus) -> PipelineResult<()> {
        let mut run = self
            .active
            .take()
            .ok_or_else(|| PipelineError::Recorder("no active run to end".into()))?;

        run.meta.end_time = Some(chrono::Local::now().to_rfc3339());
        run.meta.status   = status;
        let result = write_json(&run.dir.join(META_FILE), &run.meta);

        tracing::info!("Run '{}' ended with status {:?}", run.meta.run_id, status);
        self.last_run_dir = Some(run.dir);
        result
    }

    fn log_metric(&mut self, name: &str, value: f64) -> PipelineResult<()> {
        let run  = self.active()?;
        let step = run.steps.entry(name.to_string()).or_insert(0);
        let record = MetricRecord::new(name, value, *step);
        *step += 1;
        run.metrics.log(&record)
    }

    fn log_artifact(&mut self, path: &Path) -> PipelineResult<()> {
        let run = self.active()?;
        let file_name = path.file_name().ok_or_else(|| {
            PipelineError::Recorder(format!("artifact '{}' has no file name", path.display()))
        })?;

        let dest_dir = run.dir.join(ARTIFACTS_DIR);
        fs::create_dir_all(&dest_dir).map_err(|e| PipelineError::io(&dest_dir, e))?;
        let dest = dest_dir.join(file_name);
        fs::copy(path, &dest).map_err(|e| PipelineError::io(path, e))?;

        tracing::debug!("Logged artifact '{}'", dest.display());
        Ok(())
    }

    fn save_model(&mut self, model: &RidgeModel, destination: &Path) -> PipelineResult<PathBuf> {
        ModelStore::new(destination).save(model)
    }
}

/// Local timestamp plus a random suffix, e.g. `20261018_142501_3fa9c1`.
fn new_run_id() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..0x100_0000);
    format!("{}_{suffix:06x}", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

// ─── MemoryRecorder ───────────────────────────────────────────────────────────
/// Keeps every call in memory. Can be told to fail `log_artifact`
/// or `end_run`.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryRecorder {
    pub started:       usize,
    pub ended:         Vec<RunStatus>,
    pub metrics:       Vec<(String, f64)>,
    pub artifacts:     Vec<PathBuf>,
    pub models:        Vec<(RidgeModel, PathBuf)>,
    pub fail_artifact: bool,
    pub fail_end:      bool,
}

#[cfg(test)]
impl MemoryRecorder {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.iter().rev().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}

#[cfg(test)]
impl RunRecorder for MemoryRecorder {
    fn start_run(&mut self) -> PipelineResult<String> {
        self.started += 1;
        Ok(format!("memory-{}", self.started))
    }

    fn end_run(&mut self, status: RunStatus) -> PipelineResult<()> {
        self.ended.push(status);
        if self.fail_end {
            return Err(PipelineError::Recorder("tracking store unavailable".into()));
        }
        Ok(())
    }

    fn log_metric(&mut self, name: &str, value: f64) -> PipelineResult<()> {
        self.metrics.push((name.to_string(), value));
        Ok(())
    }

    fn log_artifact(&mut self, path: &Path) -> PipelineResult<()> {
        if self.fail_artifact {
            return Err(PipelineError::Recorder("artifact store unavailable".into()));
        }
        self.artifacts.push(path.to_path_buf());
        Ok(())
    }

    fn save_model(&mut self, model: &RidgeModel, destination: &Path) -> PipelineResult<PathBuf> {
        self.models.push((model.clone(), destination.to_path_buf()));
        Ok(destination.join(crate::infra::model_store::MODEL_FILE))
    }
}
