// ============================================================
// Layer 5: Ridge Trainer
// ============================================================
// Fits  ŷ = b + X·w  by minimising
//
//   ||y - X·w - b||² + alpha·||w||²
//
// The intercept is not penalised. Centring X and y removes it
// from the system, leaving the regularised normal equations
//
//   (Xcᵀ·Xc + alpha·I) · w = Xcᵀ · yc
//   b = ȳ - x̄ · w
//
// alpha > 0 makes the left-hand side positive definite. With
// alpha = 0 this is ordinary least squares and a rank-deficient
// X is reported as a NumericError.
//
// Reference: Hastie, Tibshirani & Friedman, ESL §3.4.1

use ndarray::{Array1, Array2, Axis};

use crate::domain::dataset::Subset;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::model::RidgeModel;
use crate::ml::linalg::solve;

pub struct RidgeTrainer {
    alpha: f64,
}

impl RidgeTrainer {
    /// `alpha` must be finite and non-negative.
    pub fn new(alpha: f64) -> PipelineResult<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "regularisation strength must be a finite value >= 0, got {alpha}"
            )));
        }
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn fit(&self, train: &Subset) -> PipelineResult<RidgeModel> {
        if train.is_empty() {
            return Err(PipelineError::InvalidConfig("training set is empty".into()));
        }
        if train.features.len() != train.labels.len() {
            return Err(PipelineError::InvalidConfig(format!(
                "{} feature rows but {} labels",
                train.features.len(),
                train.labels.len()
            )));
        }

        let x = to_matrix(&train.features)?;
        let y = Array1::from_vec(train.labels.clone());

        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(PipelineError::Numeric(
                "training data contains NaN or infinite values".into(),
            ));
        }

        // ── Centre ────────────────────────────────────────────────────────────
        // mean_axis only returns None for an empty axis, ruled out above
        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::InvalidConfig("training set is empty".into()))?;
        let y_mean = y
            .mean()
            .ok_or_else(|| PipelineError::InvalidConfig("training set is empty".into()))?;
        let xc = &x - &x_mean;
        let yc = &y - y_mean;

        // ── Regularised normal equations ─────────────────────────────────────
        let mut gram = xc.t().dot(&xc);
        gram.diag_mut().mapv_inplace(|d| d + self.alpha);
        let rhs = xc.t().dot(&yc);

        let weights   = solve(gram, rhs)?;
        let intercept = y_mean - x_mean.dot(&weights);

        tracing::debug!(
            "Fitted ridge model: alpha={}, intercept={:.6}, weights={:.6}",
            self.alpha,
            intercept,
            weights
        );

        Ok(RidgeModel {
            coefficients: weights.to_vec(),
            intercept,
            alpha: self.alpha,
        })
    }
}

/// Row-major Vec<Vec<f64>> → Array2, checking the rows are rectangular.
fn to_matrix(rows: &[Vec<f64>]) -> PipelineResult<Array2<f64>> {
    let n_cols = rows.first().map_or(0, Vec::len);
    if n_cols == 0 {
        return Err(PipelineError::InvalidConfig("training set has no feature columns".into()));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), n_cols), flat).map_err(|e| {
        PipelineError::InvalidConfig(format!("feature rows are not rectangular: {e}"))
    })
}
