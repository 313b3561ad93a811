// ============================================================
// Layer 5: ML / Model Layer
// ============================================================
// All numerical code lives here. It is the only layer that
// imports ndarray.
//
//   linalg.rs    - Gaussian elimination with partial pivoting
//
//   trainer.rs   - ridge regression fit
//                  centres the data, solves the regularised
//                  normal equations, recovers the intercept
//
//   evaluator.rs - predictions + mean-squared-error on the
//                  held-out rows
//
// Reference: ndarray crate documentation
//            Hastie, Tibshirani & Friedman, ESL §3.4

/// Dense square linear solver
pub mod linalg;

/// Ridge regression training
pub mod trainer;

/// Test-set predictions and MSE
pub mod evaluator;
