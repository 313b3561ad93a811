// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Everything that touches the filesystem on the way out of a run:
//
//   recorder.rs    - LocalRunRecorder, the file-backed RunRecorder.
//                    One directory per run with meta.json,
//                    config.json, metrics.csv and artifacts/.
//
//   run_context.rs - RunContext, the scoped handle that opens a
//                    run and guarantees it is closed.
//
//   metrics.rs     - CSV metrics log used by the recorder.
//
//   model_store.rs - model.json + model_meta.json persistence.
//
//   plot.rs        - actual-vs-predicted PNG.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §15.3 (Running Code on Cleanup with Drop)

/// File-backed run recorder
pub mod recorder;

/// Scoped run lifecycle
pub mod run_context;

/// Metrics CSV logger
pub mod metrics;

/// Model persistence
pub mod model_store;

/// Actual vs predicted plot
pub mod plot;
