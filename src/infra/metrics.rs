// ============================================================
// Layer 6: Metrics Logger
// ============================================================
// Appends run metrics to a CSV file inside the run directory.
//
// Each call to log() adds one row. A metric logged more than
// once gets an increasing step number, so the file keeps the
// full history rather than only the last value.
//
// Example CSV output:
//   name,value,step
//   Training samples,353,0
//   Test samples,89,0
//   alpha,0.03,0
//   mse,3372.6496278100326,0
//
// Reference: csv crate documentation (Writer, Reader)

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};

pub const METRICS_FILE: &str = "metrics.csv";

/// One row of the metrics log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub name:  String,
    pub value: f64,
    /// 0 for the first value of a metric, +1 for each repeat
    pub step:  u64,
}

impl MetricRecord {
    pub fn new(name: impl Into<String>, value: f64, step: u64) -> Self {
        Self { name: name.into(), value, step }
    }
}

/// Logs metrics to `<dir>/metrics.csv`.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the logger, writing the CSV header if the file is new.
    pub fn new(dir: &Path) -> PipelineResult<Self> {
        fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
        let csv_path = dir.join(METRICS_FILE);

        if !csv_path.exists() {
            let mut writer = csv::Writer::from_path(&csv_path).map_err(csv_failure)?;
            writer
                .write_record(["name", "value", "step"])
                .map_err(csv_failure)?;
            writer.flush().map_err(|e| PipelineError::io(&csv_path, e))?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one metric as a new row.
    pub fn log(&self, m: &MetricRecord) -> PipelineResult<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .map_err(|e| PipelineError::io(&self.csv_path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(m).map_err(csv_failure)?;
        writer.flush().map_err(|e| PipelineError::io(&self.csv_path, e))?;

        tracing::debug!("Logged metric {}={} (step {})", m.name, m.value, m.step);
        Ok(())
    }

    /// Read every logged row back, in logging order.
    pub fn read_all(&self) -> PipelineResult<Vec<MetricRecord>> {
        let mut reader = csv::Reader::from_path(&self.csv_path).map_err(csv_failure)?;
        reader
            .deserialize::<MetricRecord>()
            .map(|row| row.map_err(csv_failure))
            .collect()
    }
}

fn csv_failure(e: csv::Error) -> PipelineError {
    PipelineError::Recorder(format!("metrics log: {e}"))
}
