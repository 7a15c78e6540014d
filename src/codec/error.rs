//! Errors shared by the JSON, CSV and Trio codecs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{0}")]
    Schema(#[from] crate::grid::SchemaError),
    #[error("malformed JSON scalar: {0}")]
    Json(String),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("malformed Trio input at line {line}: {msg}")]
    Trio { line: usize, msg: String },
    #[error("cannot represent value {0:?} in this format")]
    Unrepresentable(crate::value::Value),
    #[error(transparent)]
    Zinc(#[from] crate::zinc::ParseError),
}
