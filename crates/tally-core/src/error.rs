//! Error types for Tally

use thiserror::Error;

use crate::row::RowError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// A statement row failed to parse. The row number counts the header as
    /// row 1, so the first data row reports as row 2.
    #[error("Row {row}: {source}")]
    Row { row: usize, source: RowError },

    #[error("The uploaded file does not contain any rows to import.")]
    EmptyFile,

    #[error("No transactions could be parsed from the uploaded statement.")]
    NoParsedRows,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Training error: {0}")]
    Training(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_errors_render_with_row_context() {
        let err = Error::Row {
            row: 3,
            source: RowError::ColumnCount,
        };
        assert_eq!(
            err.to_string(),
            "Row 3: Expected at least three columns (date, description, amount)."
        );
    }

    #[test]
    fn empty_file_message() {
        assert_eq!(
            Error::EmptyFile.to_string(),
            "The uploaded file does not contain any rows to import."
        );
    }
}
