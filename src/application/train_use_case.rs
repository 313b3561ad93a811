// ============================================================
// Layer 2: TrainUseCase (Pipeline Runner)
// ============================================================
// Orchestrates one training run inside a single RunContext:
//
//   Step 1: Load the delimited file        (Layer 4 - data)   → Loaded
//   Step 2: Split rows into train/test     (Layer 4 - data)   → Split
//   Step 3: Fit the ridge model            (Layer 5 - ml)     → Trained
//   Step 4: Predict + MSE on the test rows (Layer 5 - ml)     → Evaluated
//   Step 5: Log metrics, model and plot    (Layer 6 - infra)  → Recorded
//
// The run is opened before Step 1 and closed FINISHED after
// Step 5, then the state moves to Done. Any step failing moves
// the state to Failed, closes the run FAILED and returns the
// original error. No step is retried.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::data::{loader::DelimitedLoader, splitter::split_train_test};
use crate::domain::error::PipelineResult;
use crate::domain::state::{PipelineState, RunStatus};
use crate::domain::traits::{DataSource, RunRecorder};
use crate::infra::{
    plot::{render_actual_vs_predicted, PLOT_FILE},
    recorder::LocalRunRecorder,
    run_context::RunContext,
};
use crate::ml::{evaluator::evaluate, trainer::RidgeTrainer};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a run needs to know. Only input_data and model_output
// come from the command line; the rest are the job's fixed settings.
// Serialisable so the recorder can store it as config.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub input_data:    PathBuf,
    pub model_output:  PathBuf,
    pub tracking_dir:  PathBuf,
    pub delimiter:     char,
    pub has_header:    bool,
    pub test_fraction: f64,
    pub seed:          u64,
    pub alpha:         f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            input_data:    PathBuf::new(),
            model_output:  PathBuf::from("./outputs"),
            tracking_dir:  PathBuf::from("runs"),
            delimiter:     ',',
            has_header:    true,
            test_fraction: 0.2,
            seed:          0,
            alpha:         0.03,
        }
    }
}

// ─── RunReport ────────────────────────────────────────────────────────────────
/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id:     String,
    /// Every state visited, Idle first, Done last
    pub states:     Vec<PipelineState>,
    pub train_rows: usize,
    pub test_rows:  usize,
    pub mse:        f64,
    pub model_path: PathBuf,
    pub plot_path:  PathBuf,
}

impl RunReport {
    pub fn final_state(&self) -> PipelineState {
        self.states.last().copied().unwrap_or(PipelineState::Idle)
    }
}

/// Records the state walk and rejects illegal jumps.
struct StateTrail {
    states: Vec<PipelineState>,
}

impl StateTrail {
    fn new() -> Self {
        Self { states: vec![PipelineState::Idle] }
    }

    fn current(&self) -> PipelineState {
        self.states.last().copied().unwrap_or(PipelineState::Idle)
    }

    fn advance(&mut self, to: PipelineState) -> PipelineResult<()> {
        let next = self.current().advance(to)?;
        tracing::debug!("Pipeline state: {:?} -> {:?}", self.current(), next);
        self.states.push(next);
        Ok(())
    }
}

struct StepOutput {
    train_rows: usize,
    test_rows:  usize,
    mse:        f64,
    model_path: PathBuf,
    plot_path:  PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline against the file-backed recorder under
    /// `config.tracking_dir`.
    pub fn execute(&self) -> PipelineResult<RunReport> {
        let mut recorder = LocalRunRecorder::new(&self.config.tracking_dir)
            .with_params(&self.config)?;
        self.execute_with(&mut recorder)
    }

    /// Run the pipeline against any recorder.
    pub fn execute_with<R: RunRecorder>(&self, recorder: &mut R) -> PipelineResult<RunReport> {
        let mut trail = StateTrail::new();
        let mut run   = RunContext::open(recorder)?;
        let run_id    = run.run_id().to_string();

        match self.run_steps(&mut run, &mut trail) {
            Ok(out) => finish(run, &mut trail, run_id, out),
            Err(err) => {
                tracing::error!("Run '{}' failed in state {:?}: {}", run_id, trail.current(), err);
                trail.advance(PipelineState::Failed)?;
                if let Err(close_err) = run.close(RunStatus::Failed) {
                    tracing::warn!("Could not close failed run '{}': {}", run_id, close_err);
                }
                Err(err)
            }
        }
    }

    fn run_steps<R: RunRecorder>(
        &self,
        run:   &mut RunContext<'_, R>,
        trail: &mut StateTrail,
    ) -> PipelineResult<StepOutput> {
        let cfg = &self.config;

        // ── Step 1: Load ──────────────────────────────────────────────────────
        tracing::info!("Loading '{}'", cfg.input_data.display());
        let dataset = DelimitedLoader::new(&cfg.input_data)
            .with_delimiter(cfg.delimiter)?
            .with_header(cfg.has_header)
            .load()?;
        trail.advance(PipelineState::Loaded)?;

        // ── Step 2: Split ─────────────────────────────────────────────────────
        let split = split_train_test(dataset.len(), cfg.test_fraction, cfg.seed)?;
        let train = dataset.subset(split.train_indices())?;
        let test  = dataset.subset(split.test_indices())?;
        tracing::info!("Split: {} train, {} test", train.len(), test.len());
        trail.advance(PipelineState::Split)?;

        // ── Step 3: Train ─────────────────────────────────────────────────────
        let trainer = RidgeTrainer::new(cfg.alpha)?;
        let model   = trainer.fit(&train)?;
        tracing::info!(
            "Fitted ridge model on {} features (alpha={})",
            model.feature_count(),
            trainer.alpha()
        );
        trail.advance(PipelineState::Trained)?;

        // ── Step 4: Evaluate ──────────────────────────────────────────────────
        let evaluation = evaluate(&model, &test)?;
        println!("Mean Squared Error is {}", evaluation.mse);
        trail.advance(PipelineState::Evaluated)?;

        // ── Step 5: Record ────────────────────────────────────────────────────
        run.log_metric("Training samples", train.len() as f64)?;
        run.log_metric("Test samples", test.len() as f64)?;
        run.log_metric("alpha", cfg.alpha)?;
        run.log_metric("mse", evaluation.mse)?;

        let model_path = run.save_model(&model, &cfg.model_output)?;

        let plot_path = cfg.model_output.join(PLOT_FILE);
        render_actual_vs_predicted(&evaluation.actuals, &evaluation.predictions, &plot_path)?;
        run.log_artifact(&plot_path)?;
        trail.advance(PipelineState::Recorded)?;

        Ok(StepOutput {
            train_rows: train.len(),
            test_rows:  test.len(),
            mse:        evaluation.mse,
            model_path,
            plot_path,
        })
    }
}

/// Close a successful run and move to Done. A failed close still
/// leaves the trail in Failed.
fn finish<R: RunRecorder>(
    run:    RunContext<'_, R>,
    trail:  &mut StateTrail,
    run_id: String,
    out:    StepOutput,
) -> PipelineResult<RunReport> {
    if let Err(err) = run.close(RunStatus::Finished) {
        tracing::error!("Run '{}' could not be closed: {}", run_id, err);
        trail.advance(PipelineState::Failed)?;
        return Err(err);
    }
    trail.advance(PipelineState::Done)?;
    tracing::info!("Run '{}' done, mse={:.6}", run_id, out.mse);

    Ok(RunReport {
        run_id,
        states:     trail.states.clone(),
        train_rows: out.train_rows,
        test_rows:  out.test_rows,
        mse:        out.mse,
        model_path: out.model_path,
        plot_path:  out.plot_path,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};
    use tempfile::tempdir;

    use crate::domain::error::PipelineError;
    use crate::infra::model_store::ModelStore;
    use crate::infra::recorder::{MemoryRecorder, RunMeta, ARTIFACTS_DIR, META_FILE};

    /// 10 rows where label = 2·f1 + f2 exactly.
    fn write_linear_dataset(dir: &Path) -> PathBuf {
        let f2 = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0];
        let mut body = String::from("f1,f2,label\n");
        for (i, b) in f2.iter().enumerate() {
            let a = (i + 1) as f64;
            body.push_str(&format!("{a},{b},{}\n", 2.0 * a + b));
        }
        let path = dir.join("linear.csv");
        fs::write(&path, body).unwrap();
        path
    }

    /// The linear dataset with `cell` in place of f1 on the first
    /// row the default split holds out.
    fn write_poisoned_test_row(dir: &Path, cell: &str) -> PathBuf {
        let held_out = split_train_test(10, 0.2, 0).unwrap().test_indices()[0];
        let path = write_linear_dataset(dir);
        let body: Vec<String> = fs::read_to_string(&path)
            .unwrap()
            .lines()
            .enumerate()
            .map(|(line, text)| {
                if line == held_out + 1 {
                    let rest = text.split_once(',').unwrap().1;
                    format!("{cell},{rest}")
                } else {
                    text.to_string()
                }
            })
            .collect();
        fs::write(&path, body.join("\n") + "\n").unwrap();
        path
    }

    fn config_in(dir: &Path, input: PathBuf) -> TrainConfig {
        TrainConfig {
            input_data:   input,
            model_output: dir.join("outputs"),
            tracking_dir: dir.join("runs"),
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_default_config_matches_job_settings() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.model_output, PathBuf::from("./outputs"));
        assert_eq!(cfg.test_fraction, 0.2);
        assert_eq!(cfg.seed, 0);
        assert_eq!(cfg.alpha, 0.03);
        assert_eq!(cfg.delimiter, ',');
        assert!(cfg.has_header);
    }

    #[test]
    fn test_end_to_end_recovers_linear_relationship() {
        let dir   = tempdir().unwrap();
        let input = write_linear_dataset(dir.path());
        let cfg   = config_in(dir.path(), input);

        let mut rec = MemoryRecorder::default();
        let report  = TrainUseCase::new(cfg.clone()).execute_with(&mut rec).unwrap();

        assert_eq!(report.train_rows, 8);
        assert_eq!(report.test_rows, 2);
        assert!(report.mse < 1.0, "mse too high: {}", report.mse);
        assert_eq!(report.final_state(), PipelineState::Done);
        assert_eq!(report.states, vec![
            PipelineState::Idle,
            PipelineState::Loaded,
            PipelineState::Split,
            PipelineState::Trained,
            PipelineState::Evaluated,
            PipelineState::Recorded,
            PipelineState::Done,
        ]);

        assert_eq!(rec.started, 1);
        assert_eq!(rec.ended, vec![RunStatus::Finished]);
        assert_eq!(rec.metric("Training samples"), Some(8.0));
        assert_eq!(rec.metric("Test samples"), Some(2.0));
        assert_eq!(rec.metric("alpha"), Some(0.03));
        assert_eq!(rec.metric("mse"), Some(report.mse));
        assert_eq!(rec.models.len(), 1);
        assert_eq!(rec.models[0].1, cfg.model_output);
        assert_eq!(rec.artifacts, vec![report.plot_path.clone()]);
        assert!(report.plot_path.exists());
    }

    #[test]
    fn test_same_seed_same_result() {
        let dir   = tempdir().unwrap();
        let input = write_linear_dataset(dir.path());
        let cfg   = config_in(dir.path(), input);

        let a = TrainUseCase::new(cfg.clone()).execute_with(&mut MemoryRecorder::default()).unwrap();
        let b = TrainUseCase::new(cfg).execute_with(&mut MemoryRecorder::default()).unwrap();
        assert_eq!(a.mse, b.mse);
    }

    #[test]
    fn test_execute_writes_run_directory_and_model() {
        let dir   = tempdir().unwrap();
        let input = write_linear_dataset(dir.path());
        let cfg   = config_in(dir.path(), input);

        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();

        let model = ModelStore::new(&cfg.model_output).load().unwrap();
        assert_eq!(model.feature_count(), 2);
        assert_eq!(report.model_path, cfg.model_output.join("model.json"));

        let run_dir = cfg.tracking_dir.join(&report.run_id);
        let meta: RunMeta =
            serde_json::from_str(&fs::read_to_string(run_dir.join(META_FILE)).unwrap()).unwrap();
        assert_eq!(meta.status, RunStatus::Finished);
        assert!(run_dir.join(ARTIFACTS_DIR).join(PLOT_FILE).exists());
        assert!(run_dir.join("config.json").exists());
    }

    #[test]
    fn test_malformed_input_fails_run() {
        let dir   = tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        fs::write(&input, "a,y\n1,2\n3\n").unwrap();

        let mut rec = MemoryRecorder::default();
        let err = TrainUseCase::new(config_in(dir.path(), input))
            .execute_with(&mut rec)
            .unwrap_err();

        assert!(matches!(err, PipelineError::Format(_)));
        assert_eq!(rec.ended, vec![RunStatus::Failed]);
        assert!(rec.metrics.is_empty());
        assert!(rec.models.is_empty());
    }

    #[test]
    fn test_bad_fraction_fails_before_training() {
        let dir   = tempdir().unwrap();
        let input = write_linear_dataset(dir.path());
        let cfg   = TrainConfig { test_fraction: 1.0, ..config_in(dir.path(), input) };

        let mut rec = MemoryRecorder::default();
        let err = TrainUseCase::new(cfg).execute_with(&mut rec).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
        assert_eq!(rec.ended, vec![RunStatus::Failed]);
    }

    #[test]
    fn test_recorder_failure_during_record_step_fails_run() {
        let dir   = tempdir().unwrap();
        let input = write_linear_dataset(dir.path());

        let mut rec = MemoryRecorder { fail_artifact: true, ..Default::default() };
        let err = TrainUseCase::new(config_in(dir.path(), input))
            .execute_with(&mut rec)
            .unwrap_err();

        assert!(matches!(err, PipelineError::Recorder(_)));
        assert_eq!(rec.ended, vec![RunStatus::Failed]);
    }

    #[test]
    fn test_non_finite_held_out_row_fails_run() {
        for cell in ["NaN", "inf", "-inf"] {
            let dir   = tempdir().unwrap();
            let input = write_poisoned_test_row(dir.path(), cell);
            let cfg   = config_in(dir.path(), input);

            let mut rec = MemoryRecorder::default();
            let err = TrainUseCase::new(cfg.clone()).execute_with(&mut rec).unwrap_err();

            assert!(matches!(err, PipelineError::Numeric(_)), "{cell}: {err:?}");
            assert_eq!(rec.ended, vec![RunStatus::Failed], "{cell}");
            assert_eq!(rec.metric("mse"), None, "{cell}");
            assert!(rec.models.is_empty(), "{cell}");
            assert!(!cfg.model_output.join(PLOT_FILE).exists(), "{cell}");
        }
    }

    #[test]
    fn test_failed_close_ends_in_failed_state() {
        let mut rec = MemoryRecorder { fail_end: true, ..Default::default() };
        let run     = RunContext::open(&mut rec).unwrap();

        let mut trail = StateTrail::new();
        for state in [
            PipelineState::Loaded,
            PipelineState::Split,
            PipelineState::Trained,
            PipelineState::Evaluated,
            PipelineState::Recorded,
        ] {
            trail.advance(state).unwrap();
        }
        let out = StepOutput {
            train_rows: 8,
            test_rows:  2,
            mse:        0.5,
            model_path: PathBuf::from("outputs/model.json"),
            plot_path:  PathBuf::from("outputs").join(PLOT_FILE),
        };

        let err = finish(run, &mut trail, "memory-1".into(), out).unwrap_err();
        assert!(matches!(err, PipelineError::Recorder(_)));
        assert_eq!(trail.current(), PipelineState::Failed);
        assert_eq!(rec.ended, vec![RunStatus::Finished]);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let cfg  = TrainConfig { input_data: PathBuf::from("data/diabetes.csv"), ..TrainConfig::default() };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: TrainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
