// ============================================================
// Layer 5: Evaluator
// ============================================================
// Runs the fitted model over the held-out rows and scores it.
// Pure: no logging side effects beyond a debug line.

use crate::domain::dataset::Subset;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::model::RidgeModel;

/// Predictions for the test rows (same order as the input) and their MSE.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub predictions: Vec<f64>,
    pub actuals:     Vec<f64>,
    pub mse:         f64,
}

pub fn evaluate(model: &RidgeModel, test: &Subset) -> PipelineResult<Evaluation> {
    if test.is_empty() {
        return Err(PipelineError::InvalidConfig("test set is empty".into()));
    }
    if test.feature_count() != model.feature_count() {
        return Err(PipelineError::InvalidConfig(format!(
            "model expects {} features, test rows have {}",
            model.feature_count(),
            test.feature_count()
        )));
    }

    if let Some(i) = test
        .features
        .iter()
        .zip(&test.labels)
        .position(|(x, y)| !y.is_finite() || x.iter().any(|v| !v.is_finite()))
    {
        return Err(PipelineError::Numeric(format!("test row {i} contains non-finite values")));
    }

    let predictions: Vec<f64> = test.features.iter().map(|x| model.predict_row(x)).collect();
    if let Some(i) = predictions.iter().position(|p| !p.is_finite()) {
        return Err(PipelineError::Numeric(format!(
            "prediction for test row {i} is not finite ({})",
            predictions[i]
        )));
    }
    let mse = mean_squared_error(&test.labels, &predictions)?;
    if !mse.is_finite() {
        return Err(PipelineError::Numeric(format!("mean squared error overflowed ({mse})")));
    }

    tracing::debug!("Evaluated {} rows, mse={:.6}", predictions.len(), mse);

    Ok(Evaluation {
        predictions,
        actuals: test.labels.clone(),
        mse,
    })
}

/// Mean of squared differences over two equal-length, non-empty series.
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> PipelineResult<f64> {
    if actual.len() != predicted.len() {
        return Err(PipelineError::InvalidConfig(format!(
            "{} actuals but {} predictions",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.is_empty() {
        return Err(PipelineError::InvalidConfig("cannot score an empty series".into()));
    }
    let sum: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    Ok(sum / actual.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_count_matches_test_rows() {
        let model = RidgeModel { coefficients: vec![1.0], intercept: 0.0, alpha: 0.0 };
        let test  = Subset {
            features: vec![vec![1.0], vec![2.0], vec![3.0]],
            labels:   vec![1.0, 2.0, 5.0],
        };
        let eval = evaluate(&model, &test).unwrap();
        assert_eq!(eval.predictions, vec![1.0, 2.0, 3.0]);
        assert_eq!(eval.actuals, test.labels);
        // (0 + 0 + 4) / 3
        assert!((eval.mse - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_feature_width_mismatch() {
        let model = RidgeModel { coefficients: vec![1.0, 2.0], intercept: 0.0, alpha: 0.0 };
        let test  = Subset { features: vec![vec![1.0]], labels: vec![1.0] };
        assert!(evaluate(&model, &test).is_err());
    }

    #[test]
    fn test_mse_of_perfect_fit_is_zero() {
        assert_eq!(mean_squared_error(&[1.0, 2.0], &[1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_mse_rejects_empty_and_uneven_series() {
        assert!(matches!(mean_squared_error(&[], &[]), Err(PipelineError::InvalidConfig(_))));
        assert!(matches!(
            mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_non_finite_test_rows_rejected() {
        let model = RidgeModel { coefficients: vec![1.0], intercept: 0.0, alpha: 0.0 };

        let nan_feature = Subset { features: vec![vec![1.0], vec![f64::NAN]], labels: vec![1.0, 2.0] };
        assert!(matches!(evaluate(&model, &nan_feature), Err(PipelineError::Numeric(_))));

        let inf_feature = Subset { features: vec![vec![f64::INFINITY]], labels: vec![1.0] };
        assert!(matches!(evaluate(&model, &inf_feature), Err(PipelineError::Numeric(_))));

        let nan_label = Subset { features: vec![vec![1.0]], labels: vec![f64::NAN] };
        assert!(matches!(evaluate(&model, &nan_label), Err(PipelineError::Numeric(_))));
    }

    #[test]
    fn test_overflowing_prediction_rejected() {
        let model = RidgeModel { coefficients: vec![1e300], intercept: 0.0, alpha: 0.0 };
        let test  = Subset { features: vec![vec![1e300]], labels: vec![1.0] };
        assert!(matches!(evaluate(&model, &test), Err(PipelineError::Numeric(_))));
    }
}
