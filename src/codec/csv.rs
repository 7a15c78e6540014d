//! CSV codec (spec §4.D): lossy but deterministic. Markers become `✓`,
//! Null becomes an empty field, and every other scalar is written through
//! the Zinc literal grammar (quoted strings included) so a cell's Zinc
//! form is the single source of truth for what type it decodes back to.

use super::error::CodecError;
use crate::grid::Grid;
use crate::value::{Dict, Value};
use crate::zinc::emitter::emit_scalar;

const MARKER_GLYPH: &str = "\u{2713}";

pub fn encode_csv(grid: &Grid) -> Result<String, CodecError> {
    let mut writer = ::csv::WriterBuilder::new().from_writer(vec![]);

    let headers: Vec<&str> = grid.col_names().map(|n| n.as_str()).collect();
    writer.write_record(&headers)?;

    for row in grid.rows() {
        let record: Vec<String> = headers
            .iter()
            .map(|name| encode_cell(row.get(name)))
            .collect::<Result<Vec<String>, CodecError>>()?;
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner().map_err(|e| CodecError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CodecError::Io(e.to_string()))
}

/// Encode a single cell. A nested `Grid` cannot be faithfully represented
/// in a flat CSV field (spec §7's worked `Unrepresentable` example); every
/// other scalar goes through `emit_scalar`, which quotes `Str` the same way
/// the Zinc emitter does so `decode_cell` can tell a string literal apart
/// from a bare word token.
fn encode_cell(value: Option<&Value>) -> Result<String, CodecError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::Marker) => Ok(MARKER_GLYPH.to_owned()),
        Some(v @ Value::Grid(_)) => Err(CodecError::Unrepresentable(v.clone())),
        Some(other) => Ok(emit_scalar(other)),
    }
}

/// Decode CSV text into a Grid, inferring column names from the header
/// row. Each cell is interpreted, in order: empty => Null, `✓` => Marker,
/// else the full Zinc scalar grammar — a quoted cell decodes as `Str`, an
/// unquoted one as whatever scalar it lexes as, falling back to a bare
/// `Str` only if it doesn't parse as Zinc at all.
pub fn decode_csv(text: &str) -> Result<Grid, CodecError> {
    tracing::trace!("decoding {} bytes of csv", text.len());
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_owned())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Dict::new();
        for (name, cell) in headers.iter().zip(record.iter()) {
            let value = decode_cell(cell);
            if !value.is_null() {
                row.insert(name.clone(), value);
            }
        }
        rows.push(row);
    }

    Grid::from_rows(rows).map_err(CodecError::from)
}

fn decode_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if cell == MARKER_GLYPH {
        return Value::Marker;
    }
    match crate::zinc::parse_scalar(cell) {
        Ok(value) => value,
        Err(_) => Value::str(cell),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::Number;

    #[test]
    fn marker_and_null_round_trip() {
        let rows = vec![
            Dict::new().with("id", Value::str("a")).with("site", Value::Marker),
            Dict::new().with("id", Value::str("b")),
        ];
        let grid = Grid::from_rows(rows).unwrap();
        let csv = encode_csv(&grid).unwrap();
        assert!(csv.contains(MARKER_GLYPH));

        let decoded = decode_csv(&csv).unwrap();
        assert_eq!(decoded.rows()[0].get("site"), Some(&Value::Marker));
        assert_eq!(decoded.rows()[1].get("site"), None);
    }

    #[test]
    fn number_round_trips_through_zinc_literal() {
        let rows = vec![Dict::new()
            .with("id", Value::str("a"))
            .with("area", Value::Number(Number::new(100.0, Some("ft2".to_owned()))))];
        let grid = Grid::from_rows(rows).unwrap();
        let csv = encode_csv(&grid).unwrap();
        let decoded = decode_csv(&csv).unwrap();
        assert_eq!(
            decoded.rows()[0].get("area"),
            Some(&Value::Number(Number::new(100.0, Some("ft2".to_owned()))))
        );
    }

    #[test]
    fn string_that_looks_like_a_zinc_word_round_trips_as_a_string() {
        let rows = vec![Dict::new()
            .with("id", Value::str("a"))
            .with("status", Value::str("T"))];
        let grid = Grid::from_rows(rows).unwrap();
        let csv = encode_csv(&grid).unwrap();
        assert!(csv.contains("\"T\""));

        let decoded = decode_csv(&csv).unwrap();
        assert_eq!(decoded.rows()[0].get("status"), Some(&Value::str("T")));
    }

    #[test]
    fn string_that_looks_like_a_number_round_trips_as_a_string() {
        let rows = vec![Dict::new()
            .with("id", Value::str("a"))
            .with("floor", Value::str("30"))];
        let grid = Grid::from_rows(rows).unwrap();
        let csv = encode_csv(&grid).unwrap();
        let decoded = decode_csv(&csv).unwrap();
        assert_eq!(decoded.rows()[0].get("floor"), Some(&Value::str("30")));
    }

    #[test]
    fn nested_grid_cell_is_unrepresentable() {
        let inner = Grid::from_rows(vec![Dict::new().with("id", Value::str("x"))]).unwrap();
        let rows = vec![Dict::new()
            .with("id", Value::str("a"))
            .with("history", Value::Grid(Box::new(inner)))];
        let grid = Grid::from_rows(rows).unwrap();
        let err = encode_csv(&grid).unwrap_err();
        assert!(matches!(err, CodecError::Unrepresentable(Value::Grid(_))));
    }
}
