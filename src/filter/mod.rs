//! The Haystack filter sublanguage (spec §4.E/§4.F): a grammar for
//! selecting entities by tag conditions, plus an in-memory evaluator.

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;

pub use ast::{CmpOp, FilterNode, Path};
pub use error::FilterParseError;
pub use eval::{evaluate, evaluate_grid};

/// Parse a filter string into an AST (spec §4.E).
pub fn parse_filter(input: &str) -> Result<FilterNode, FilterParseError> {
    tracing::trace!("parsing filter: {input}");
    parser::parse_filter(input).map_err(|e| {
        tracing::debug!("filter parse failed: {e}");
        e
    })
}
