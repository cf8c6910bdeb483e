use std::{fs::File, io, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use ndarray::{arr2, s, Array2, ArrayView2, ShapeError};
use thiserror::Error;

use crate::network::{INPUT_SIZE, OUTPUT_SIZE};

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open dataset: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("line {line}, column {column}: `{value}` is not a number")]
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },
    #[error("expected {expected} feature columns, found {found}")]
    FeatureCount { expected: usize, found: usize },
    #[error("expected {expected} label column, found {found}")]
    LabelCount { expected: usize, found: usize },
    #[error("{features} feature rows but {labels} label rows")]
    RowMismatch { features: usize, labels: usize },
    #[error("dataset has no samples")]
    Empty,
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Features (n_samples, INPUT_SIZE) and labels (n_samples, OUTPUT_SIZE)
/// whose shapes have been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f64>,
    labels: Array2<f64>,
}

impl Dataset {
    pub fn new(features: Array2<f64>, labels: Array2<f64>) -> Result<Self, DataError> {
        if features.ncols() != INPUT_SIZE {
            return Err(DataError::FeatureCount {
                expected: INPUT_SIZE,
                found: features.ncols(),
            });
        }
        if labels.ncols() != OUTPUT_SIZE {
            return Err(DataError::LabelCount {
                expected: OUTPUT_SIZE,
                found: labels.ncols(),
            });
        }
        if features.nrows() != labels.nrows() {
            return Err(DataError::RowMismatch {
                features: features.nrows(),
                labels: labels.nrows(),
            });
        }
        if features.nrows() == 0 {
            return Err(DataError::Empty);
        }

        Ok(Self { features, labels })
    }

    /// The XOR truth table.
    pub fn xor() -> Self {
        Self {
            features: arr2(&[[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]),
            labels: arr2(&[[0.0], [1.0], [1.0], [0.0]]),
        }
    }

    /// Build from two blocks of text with one comma-separated sample per line.
    pub fn from_text(features: &str, labels: &str) -> Result<Self, DataError> {
        Dataset::new(
            parse_matrix(features, INPUT_SIZE)?,
            parse_matrix(labels, OUTPUT_SIZE)?,
        )
    }

    /// Read `x1,x2,y` rows.
    pub fn from_csv_reader<R: io::Read>(reader: R, has_headers: bool) -> Result<Self, DataError> {
        let columns = INPUT_SIZE + OUTPUT_SIZE;
        let mut reader = ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);
        let table = collect_rows(reader.records(), columns)?;

        Dataset::new(
            table.slice(s![.., ..INPUT_SIZE]).to_owned(),
            table.slice(s![.., INPUT_SIZE..]).to_owned(),
        )
    }

    pub fn from_path(path: impl AsRef<Path>, has_headers: bool) -> Result<Self, DataError> {
        let file = File::open(path)?;
        Dataset::from_csv_reader(file, has_headers)
    }

    pub fn features(&self) -> ArrayView2<f64> {
        self.features.view()
    }

    pub fn labels(&self) -> ArrayView2<f64> {
        self.labels.view()
    }

    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse comma-separated rows of numbers into a (rows, `columns`) matrix.
/// Blank lines are skipped.
pub fn parse_matrix(text: &str, columns: usize) -> Result<Array2<f64>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    collect_rows(reader.records(), columns)
}

fn collect_rows<I>(records: I, columns: usize) -> Result<Array2<f64>, DataError>
where
    I: Iterator<Item = Result<StringRecord, csv::Error>>,
{
    let mut values = Vec::new();
    let mut rows = 0;
    for record in records {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != columns {
            return Err(DataError::ColumnCount {
                line,
                expected: columns,
                found: record.len(),
            });
        }
        for (column, field) in record.iter().enumerate() {
            let value = field.parse::<f64>().map_err(|_| DataError::InvalidNumber {
                line,
                column: column + 1,
                value: field.to_string(),
            })?;
            values.push(value);
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(DataError::Empty);
    }
    Ok(Array2::from_shape_vec((rows, columns), values)?)
}
