// ============================================================
// Layer 3: Split Domain Type
// ============================================================
// Two disjoint row-index sets that together cover the dataset.
// Built once by the splitter and never mutated.

use std::collections::HashSet;

use crate::domain::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    train: Vec<usize>,
    test:  Vec<usize>,
}

impl Split {
    /// Build a split over `0..total`, checking disjointness and coverage.
    pub fn new(train: Vec<usize>, test: Vec<usize>, total: usize) -> PipelineResult<Self> {
        let mut seen = HashSet::with_capacity(total);
        for &i in train.iter().chain(test.iter()) {
            if i >= total || !seen.insert(i) {
                return Err(PipelineError::InvalidConfig(format!(
                    "row {i} is out of range or assigned twice"
                )));
            }
        }
        if seen.len() != total {
            return Err(PipelineError::InvalidConfig(format!(
                "split covers {} of {} rows",
                seen.len(),
                total
            )));
        }
        Ok(Self { train, test })
    }

    pub fn train_indices(&self) -> &[usize] {
        &self.train
    }

    pub fn test_indices(&self) -> &[usize] {
        &self.test
    }
}
