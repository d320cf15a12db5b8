use std::path::PathBuf;

use thiserror::Error;

/// Load-time failure. Every variant is fatal: the dashboard cannot render
/// without the full joined dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataSourceError {
    #[error("data source not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("unsupported data source {} (expected a workbook, a .json document, or a directory of .csv/.parquet sheets)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("sheet '{sheet}' is missing")]
    MissingSheet { sheet: String },

    #[error("sheet '{sheet}' has no column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("sheet '{sheet}', row {row}, column '{column}': expected {expected}, found '{found}'")]
    InvalidCell {
        sheet: String,
        row: usize,
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("sheet '{sheet}', row {row}, column '{column}': rating {value} is outside [0, 5]")]
    RatingOutOfRange {
        sheet: String,
        row: usize,
        column: String,
        value: f64,
    },

    #[error("sheet '{sheet}' has duplicate key '{key}'")]
    DuplicateKey { sheet: String, key: String },
}

impl DataSourceError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DataSourceError::Unreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
