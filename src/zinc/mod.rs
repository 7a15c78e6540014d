//! The Zinc textual format (spec §4.C): a recursive-descent parser and a
//! deterministic emitter, sharing a character-level `Cursor` and a closed
//! `ErrorKind` set.

pub mod emitter;
pub mod error;
mod lexer;
mod parser;

pub use error::{ErrorKind, ParseError};

use crate::grid::Grid;

/// Parse a Zinc document into a `Grid`. Accepts both `ver:"2.0"` and
/// `ver:"3.0"` headers; a grid parsed from `"2.0"` is otherwise handled
/// identically (spec §6) and will always be re-emitted as `"3.0"`.
pub fn parse_zinc(text: &str) -> Result<Grid, ParseError> {
    tracing::trace!("parsing {} bytes of zinc", text.len());
    let result = parser::parse_grid(text);
    if let Err(e) = &result {
        tracing::debug!("zinc parse failed: {e}");
    }
    result
}

/// Emit a `Grid` as a Zinc document.
pub fn emit_zinc(grid: &Grid) -> String {
    tracing::trace!("emitting zinc grid with {} rows", grid.size());
    emitter::emit_grid(grid)
}

/// Parse a single, standalone Zinc scalar literal (not a whole grid).
/// Used by the CSV codec, whose cells are bare Zinc scalars with no
/// surrounding grid framing.
pub fn parse_scalar(s: &str) -> Result<crate::value::Value, ParseError> {
    parser::parse_scalar(s, 1)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::Value;

    #[test]
    fn round_trips_a_simple_grid() {
        let zinc = "ver:\"3.0\"\nid,dis\n@a,\"Alpha\"\n@b,\"Beta\"\n";
        let grid = parse_zinc(zinc).unwrap();
        assert_eq!(grid.size(), 2);
        assert_eq!(
            grid.rows()[0].get("dis"),
            Some(&Value::str("Alpha"))
        );

        let emitted = emit_zinc(&grid);
        let reparsed = parse_zinc(&emitted).unwrap();
        assert_eq!(grid, reparsed);
    }

    #[test]
    fn empty_cell_is_null() {
        let zinc = "ver:\"3.0\"\na,b\n1,\n";
        let grid = parse_zinc(zinc).unwrap();
        assert_eq!(grid.rows()[0].get("b"), Some(&Value::Null));
        assert_ne!(grid.rows()[0].get("b"), Some(&Value::str("")));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let zinc = "ver:\"3.0\"\nid,id\n@a,@b\n";
        assert!(parse_zinc(zinc).is_err());
    }

    #[test]
    fn datetime_requires_tz_suffix() {
        let zinc = "ver:\"3.0\"\nts\n2021-01-01T00:00:00-05:00\n";
        let err = parse_zinc(zinc).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingTz { .. }));
    }

    #[test]
    fn nested_grid_round_trips() {
        let zinc = "ver:\"3.0\"\na\n<<ver:\"3.0\"\nx\n1\n2\n>>\n";
        let grid = parse_zinc(zinc).unwrap();
        match grid.rows()[0].get("a") {
            Some(Value::Grid(inner)) => assert_eq!(inner.size(), 2),
            other => panic!("expected nested grid, got {:?}", other),
        }
    }
}
