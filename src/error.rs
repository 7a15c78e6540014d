//! Crate-wide error taxonomy (spec §7): kinds, not a single flat type.
//! Each lower-level module (`zinc`, `codec`, `filter`, `grid`) owns its own
//! position-tagged error type; `CoreError` unifies them for call sites that
//! cross module boundaries, such as [`crate::provider::Provider`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Parse(#[from] crate::zinc::ParseError),

    #[error(transparent)]
    Schema(#[from] crate::grid::SchemaError),

    #[error(transparent)]
    Codec(#[from] crate::codec::CodecError),

    #[error(transparent)]
    Filter(#[from] crate::filter::FilterParseError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("storage layer failure: {0}")]
    Data(String),
}

/// Raised when a [`crate::provider::Provider`] is asked for an operation it
/// does not implement (spec §4.H "Providers are free to implement any
/// subset").
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("operation not implemented by this provider: {operation}")]
pub struct CapabilityError {
    pub operation: &'static str,
}
