// ============================================================
// Layer 4: Delimited Dataset Loader
// ============================================================
// Reads a delimited numeric text file (CSV by default) with the
// csv crate and turns it into a Dataset.
//
// File shape the loader expects:
//
//   age,sex,bmi,bp,...,target      ← optional header, skipped
//   0.038,0.050,0.061,...,151.0
//   -0.001,-0.044,-0.051,...,75.0
//
// Every data row must have the same number of cells as the first
// data row and every cell must parse as f64. Blank lines are
// ignored and cells are trimmed, so "1.0, 2.0" loads fine.
//
// Reference: csv crate documentation (ReaderBuilder)
//            Rust Book §9 (Error Handling)

use std::path::{Path, PathBuf};

use crate::domain::dataset::Dataset;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::traits::DataSource;

/// Loads a single delimited file.
/// Implements the DataSource trait from Layer 3.
pub struct DelimitedLoader {
    path:       PathBuf,
    delimiter:  u8,
    has_header: bool,
}

impl DelimitedLoader {
    /// Comma-delimited with a header row.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), delimiter: b',', has_header: true }
    }

    /// Use a different single-byte ASCII delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> PipelineResult<Self> {
        if !delimiter.is_ascii() {
            return Err(PipelineError::InvalidConfig(format!(
                "delimiter '{delimiter}' is not a single ASCII character"
            )));
        }
        self.delimiter = delimiter as u8;
        Ok(self)
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

impl DataSource for DelimitedLoader {
    fn load(&self) -> PipelineResult<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_header)
            // Width checks are done below so the error names the line
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| csv_error(&self.path, e))?;

        let columns = if self.has_header {
            let header: Vec<String> = reader
                .headers()
                .map_err(|e| csv_error(&self.path, e))?
                .iter()
                .map(str::to_string)
                .collect();
            (!header.is_empty()).then_some(header)
        } else {
            None
        };

        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut width: Option<usize> = None;

        for result in reader.records() {
            let record = result.map_err(|e| csv_error(&self.path, e))?;
            let line   = record.position().map_or(0, |p| p.line());

            // Whitespace-only lines trim down to a single empty field
            if record.iter().all(str::is_empty) {
                continue;
            }

            match width {
                Some(w) if record.len() != w => {
                    return Err(PipelineError::Format(format!(
                        "line {line}: expected {w} columns, found {}",
                        record.len()
                    )));
                }
                Some(_) => {}
                None => width = Some(record.len()),
            }

            let row = record
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    cell.parse::<f64>().map_err(|_| {
                        PipelineError::Format(format!(
                            "line {line}, column {}: '{cell}' is not numeric",
                            col + 1
                        ))
                    })
                })
                .collect::<PipelineResult<Vec<f64>>>()?;

            rows.push(row);
        }

        let dataset = Dataset::new(columns, rows)?;
        tracing::info!(
            "Loaded {} rows x {} columns from '{}'",
            dataset.len(),
            dataset.width(),
            self.path.display()
        );
        if let Some(names) = dataset.columns() {
            tracing::debug!("Columns: {}", names.join(", "));
        }
        Ok(dataset)
    }
}

/// Split csv errors into I/O failures (with the path) and format failures.
fn csv_error(path: &Path, err: csv::Error) -> PipelineError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => PipelineError::io(path, source),
        _ => PipelineError::Format(message),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_row_count_is_lines_minus_header() {
        let dir  = tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "a,b,y\n1,2,3\n4,5,6\n7,8,9\n");
        let ds   = DelimitedLoader::new(&path).load().unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.width(), 3);
        assert_eq!(ds.columns().unwrap(), &["a", "b", "y"]);
        assert_eq!(ds.row(1).unwrap(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let dir  = tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "a,y\n1,2\n\n3,4\n   \n5,6\n\n\n");
        let ds   = DelimitedLoader::new(&path).load().unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.row(1).unwrap(), &[3.0, 4.0]);
        assert_eq!(ds.row(2).unwrap(), &[5.0, 6.0]);
    }

    #[test]
    fn test_without_header_every_line_is_data() {
        let dir  = tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "1,2\n3,4\n");
        let ds   = DelimitedLoader::new(&path).with_header(false).load().unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.columns().is_none());
    }

    #[test]
    fn test_custom_delimiter_and_whitespace() {
        let dir  = tempdir().unwrap();
        let path = write(dir.path(), "d.tsv", "x\ty\n 1.5\t 2\n3\t4e1\n");
        let ds   = DelimitedLoader::new(&path)
            .with_delimiter('\t')
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(ds.row(0).unwrap(), &[1.5, 2.0]);
        assert_eq!(ds.row(1).unwrap(), &[3.0, 40.0]);
    }

    #[test]
    fn test_ragged_row_is_format_error() {
        let dir  = tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "a,b,y\n1,2,3\n4,5\n");
        let err  = DelimitedLoader::new(&path).load().unwrap_err();
        match err {
            PipelineError::Format(msg) => assert!(msg.contains("line 3"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_cell_is_format_error() {
        let dir  = tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "a,y\n1,2\nthree,4\n");
        let err  = DelimitedLoader::new(&path).load().unwrap_err();
        match err {
            PipelineError::Format(msg) => assert!(msg.contains("'three'"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_header_only_file_is_format_error() {
        let dir  = tempdir().unwrap();
        let path = write(dir.path(), "d.csv", "a,b,y\n");
        assert!(matches!(
            DelimitedLoader::new(&path).load(),
            Err(PipelineError::Format(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = DelimitedLoader::new(dir.path().join("nope.csv")).load().unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(DelimitedLoader::new("x.csv").with_delimiter('§').is_err());
    }
}
