//! FILENAME: core/survey/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Variable id must not be empty")]
    EmptyVariableId,

    #[error("Column '{column}' has {actual} values, dataset has {expected} respondents")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Row {row} has {actual} values, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Invalid variable record: {0}")]
    InvalidRecord(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SurveyResult<T> = Result<T, SurveyError>;
