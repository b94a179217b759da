use thiserror::Error;

/// Schema-level problems found while reading an employee table.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("invalid attrition value '{0}' (expected Yes or No)")]
    InvalidAttrition(String),

    #[error("invalid join date '{0}'")]
    InvalidDate(String),

    #[error("row {row}: missing value in column '{column}'")]
    NullCell { row: usize, column: &'static str },
}
