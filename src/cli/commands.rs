// ============================================================
// Layer 1: CLI Arguments
// ============================================================
// The job takes exactly two flags:
//
//   --input_data   path to the delimited numeric file (required)
//   --model_output directory for the model and plot (./outputs)
//
// Everything else about the run is fixed in TrainConfig::default().
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;
use clap::Args;

use crate::application::train_use_case::TrainConfig;

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Delimited numeric file; last column is the label
    #[arg(long = "input_data")]
    pub input_data: PathBuf,

    /// Directory the fitted model and plot are written to
    #[arg(long = "model_output", default_value = "./outputs")]
    pub model_output: PathBuf,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            input_data:   a.input_data,
            model_output: a.model_output,
            ..TrainConfig::default()
        }
    }
}
