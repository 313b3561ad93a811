// ============================================================
// Layer 4: Train/Test Splitter
// ============================================================
// Partitions row indices into a training set and a held-out
// test set:
//
//   n_test  = ceil(test_fraction * n)
//   n_train = n - n_test
//
// Rows are shuffled with a Fisher-Yates shuffle driven by a
// seeded StdRng, so the same (n, fraction, seed) always gives
// the same partition. The first n_test shuffled indices are the
// test set, the remainder the training set.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::split::Split;

/// Deterministically split `total` rows into (train, test) index sets.
///
/// # Errors
/// `InvalidConfig` if `test_fraction` is not strictly between 0 and 1,
/// if there are fewer than 2 rows, or if the training side would be empty.
pub fn split_train_test(total: usize, test_fraction: f64, seed: u64) -> PipelineResult<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::InvalidConfig(format!(
            "test fraction must lie in (0, 1), got {test_fraction}"
        )));
    }
    if total < 2 {
        return Err(PipelineError::InvalidConfig(format!(
            "need at least 2 rows to split, dataset has {total}"
        )));
    }

    let n_test = (test_fraction * total as f64).ceil() as usize;
    if n_test >= total {
        return Err(PipelineError::InvalidConfig(format!(
            "test fraction {test_fraction} leaves no training rows out of {total}"
        )));
    }

    let mut order: Vec<usize> = (0..total).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    // split_off(n) leaves [0..n) in `order` and returns [n..total)
    let train = order.split_off(n_test);
    let test  = order;

    tracing::debug!(
        "Dataset split: {} training, {} test (seed {})",
        train.len(),
        test.len(),
        seed
    );

    Split::new(train, test, total)
}
