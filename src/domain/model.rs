// ============================================================
// Layer 3: Fitted Ridge Model
// ============================================================
// The output of the trainer:
//
//   ŷ = intercept + Σ coefficients[j] · x[j]
//
// Plain data so the recorder can serialise it without knowing
// anything about how it was fitted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeModel {
    /// One weight per feature column, in column order
    pub coefficients: Vec<f64>,
    pub intercept:    f64,
    /// Regularisation strength the model was fitted with
    pub alpha:        f64,
}

impl RidgeModel {
    pub fn feature_count(&self) -> usize {
        self.coefficients.len()
    }

    pub fn predict_row(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}
