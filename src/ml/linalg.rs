// ============================================================
// Layer 5: Dense Linear Solver
// ============================================================
// Solves A·x = b for a small square system with Gaussian
// elimination and partial pivoting.
//
// A pivot smaller than RANK_TOLERANCE · max|A[i][i]| means the
// system is (numerically) singular and is reported as a
// NumericError instead of returning an unstable solution.

use ndarray::{Array1, Array2};

use crate::domain::error::{PipelineError, PipelineResult};

const RANK_TOLERANCE: f64 = 1e-10;

pub fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> PipelineResult<Array1<f64>> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return Err(PipelineError::Numeric(format!(
            "system shape mismatch: A is {}x{}, b has {}",
            a.nrows(),
            a.ncols(),
            b.len()
        )));
    }

    let scale = a.diag().iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let tol   = scale * RANK_TOLERANCE;

    // ── Forward elimination ───────────────────────────────────────────────────
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);

        let pivot = a[[pivot_row, col]];
        if !pivot.is_finite() || pivot.abs() <= tol {
            return Err(PipelineError::Numeric(format!(
                "matrix is rank deficient (pivot {pivot:.3e} in column {col})"
            )));
        }

        if pivot_row != col {
            for k in 0..n {
                a.swap([col, k], [pivot_row, k]);
            }
            b.swap(col, pivot_row);
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    // ── Back substitution ─────────────────────────────────────────────────────
    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(PipelineError::Numeric("solution contains non-finite values".into()));
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_solves_with_pivoting() {
        // First pivot is zero without a row swap
        let a = array![[0.0, 2.0], [3.0, 1.0]];
        let b = array![4.0, 5.0];
        let x = solve(a, b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_matrix_is_numeric_error() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let b = array![1.0, 2.0];
        assert!(matches!(solve(a, b), Err(PipelineError::Numeric(_))));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = Array2::<f64>::zeros((2, 3));
        let b = Array1::<f64>::zeros(2);
        assert!(solve(a, b).is_err());
    }
}
