//! Zinc parse errors (spec §4.C "Errors"): every failure is tagged with the
//! 1-based line/column it occurred at, and a closed-set `kind`.

use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{line}:{col}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub col: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(line: usize, col: usize, kind: ErrorKind) -> Self {
        ParseError { line, col, kind }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ErrorKind {
    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { found: String, expected: String },
    #[error("bad escape sequence '\\{escape}'")]
    BadEscape { escape: String },
    #[error("bad number '{text}'")]
    BadNumber { text: String },
    #[error("DateTime '{text}' is missing its time zone suffix")]
    MissingTz { text: String },
    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("could not parse '{text}' as a scalar")]
    UnknownScalar { text: String },
}
