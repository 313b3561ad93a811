// ============================================================
// Layer 6: Run Context
// ============================================================
// Scoped handle on one tracked run.
//
//   open()   → recorder.start_run()
//   close()  → recorder.end_run(status)
//   drop     → recorder.end_run(Failed) if close() never ran
//
// The pipeline holds the only RunContext for the whole run, so
// every exit path (Ok, `?`, panic unwind) ends the run exactly once.

use std::path::{Path, PathBuf};

use crate::domain::error::PipelineResult;
use crate::domain::model::RidgeModel;
use crate::domain::state::RunStatus;
use crate::domain::traits::RunRecorder;

pub struct RunContext<'r, R: RunRecorder> {
    recorder: &'r mut R,
    run_id:   String,
    closed:   bool,
}

impl<'r, R: RunRecorder> RunContext<'r, R> {
    pub fn open(recorder: &'r mut R) -> PipelineResult<Self> {
        let run_id = recorder.start_run()?;
        Ok(Self { recorder, run_id, closed: false })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_metric(&mut self, name: &str, value: f64) -> PipelineResult<()> {
        self.recorder.log_metric(name, value)
    }

    pub fn log_artifact(&mut self, path: &Path) -> PipelineResult<()> {
        self.recorder.log_artifact(path)
    }

    pub fn save_model(&mut self, model: &RidgeModel, destination: &Path) -> PipelineResult<PathBuf> {
        self.recorder.save_model(model, destination)
    }

    /// End the run with `status`. Consumes the context.
    pub fn close(mut self, status: RunStatus) -> PipelineResult<()> {
        self.closed = true;
        self.recorder.end_run(status)
    }
}

impl<R: RunRecorder> Drop for RunContext<'_, R> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        tracing::warn!("Run '{}' dropped without close; marking FAILED", self.run_id);
        if let Err(e) = self.recorder.end_run(RunStatus::Failed) {
            tracing::warn!("Could not end run '{}': {}", self.run_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::recorder::MemoryRecorder;

    #[test]
    fn test_close_ends_run_once() {
        let mut rec = MemoryRecorder::default();
        {
            let mut ctx = RunContext::open(&mut rec).unwrap();
            assert_eq!(ctx.run_id(), "memory-1");
            ctx.log_metric("alpha", 0.03).unwrap();
            ctx.close(RunStatus::Finished).unwrap();
        }
        assert_eq!(rec.ended, vec![RunStatus::Finished]);
        assert_eq!(rec.metric("alpha"), Some(0.03));
    }

    #[test]
    fn test_drop_without_close_marks_failed() {
        let mut rec = MemoryRecorder::default();
        {
            let _ctx = RunContext::open(&mut rec).unwrap();
        }
        assert_eq!(rec.started, 1);
        assert_eq!(rec.ended, vec![RunStatus::Failed]);
    }

    #[test]
    fn test_early_return_marks_failed() {
        fn step(rec: &mut MemoryRecorder) -> PipelineResult<()> {
            let mut ctx = RunContext::open(rec)?;
            ctx.log_artifact(Path::new("missing.png"))?;
            ctx.close(RunStatus::Finished)
        }

        let mut rec = MemoryRecorder { fail_artifact: true, ..Default::default() };
        assert!(step(&mut rec).is_err());
        assert_eq!(rec.ended, vec![RunStatus::Failed]);
    }
}
