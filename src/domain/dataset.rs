// ============================================================
// Layer 3: Dataset Domain Type
// ============================================================
// An ordered sequence of numeric rows. The last column is the
// label, everything before it is a feature.
//
//   f1    f2    ...  label
//   0.03  1.0   ...  151.0     ← row 0
//   ...
//
// Invariants enforced by `Dataset::new`:
//   - at least one row
//   - at least two columns (one feature + the label)
//   - every row has the same width
//
// A Dataset is read-only once built. Subsets for training and
// evaluation are copied out with `subset()`.

use crate::domain::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone)]
pub struct Dataset {
    /// Header names, kept only for log output
    columns: Option<Vec<String>>,
    rows:    Vec<Vec<f64>>,
    width:   usize,
}

impl Dataset {
    pub fn new(columns: Option<Vec<String>>, rows: Vec<Vec<f64>>) -> PipelineResult<Self> {
        let width = rows
            .first()
            .map(Vec::len)
            .ok_or_else(|| PipelineError::Format("dataset contains no data rows".into()))?;

        if width < 2 {
            return Err(PipelineError::Format(format!(
                "need at least one feature and one label column, found {width} column(s)"
            )));
        }

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(PipelineError::Format(format!(
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                width
            )));
        }

        Ok(Self { columns, rows, width })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn feature_count(&self) -> usize {
        self.width - 1
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Copy the rows at `indices` (in that order) into a
    /// feature/label pair.
    pub fn subset(&self, indices: &[usize]) -> PipelineResult<Subset> {
        let mut features = Vec::with_capacity(indices.len());
        let mut labels   = Vec::with_capacity(indices.len());

        for &i in indices {
            let row = self.row(i).ok_or_else(|| {
                PipelineError::InvalidConfig(format!(
                    "row index {i} out of range for dataset of {} rows",
                    self.len()
                ))
            })?;
            let (x, y) = row.split_at(self.feature_count());
            features.push(x.to_vec());
            labels.push(y[0]);
        }

        Ok(Subset { features, labels })
    }
}

/// Features and labels for one side of a split.
#[derive(Debug, Clone, PartialEq)]
pub struct Subset {
    pub features: Vec<Vec<f64>>,
    pub labels:   Vec<f64>,
}

impl Subset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }
}
