// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and hands a TrainConfig to
// the application layer. All pipeline logic lives in Layer 2.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;

use crate::application::train_use_case::TrainUseCase;
use commands::TrainArgs;

#[derive(Parser, Debug)]
#[command(
    name = "ridge-runner",
    version,
    about = "Fit a ridge regression on a delimited numeric file and record the run."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: TrainArgs,
}

impl Cli {
    /// Run one training job. Any pipeline error is returned as-is
    /// so main exits non-zero.
    pub fn run(self) -> Result<()> {
        println!("Training data path: {}", self.args.input_data.display());
        println!("Model output path: {}", self.args.model_output.display());

        let use_case = TrainUseCase::new(self.args.into());
        let report   = use_case.execute()?;

        tracing::info!(
            "Run {} finished: {} train / {} test rows, model at '{}'",
            report.run_id,
            report.train_rows,
            report.test_rows,
            report.model_path.display()
        );
        Ok(())
    }
}
