//! Deterministic Zinc writer (spec §4.C "Emission"). Row and column order
//! are preserved exactly as stored; Null cells are emitted as empty cells;
//! every grid is emitted as `ver:"3.0"` regardless of what version it was
//! parsed from (spec §6).

use super::lexer::escape_str;
use crate::grid::Grid;
use crate::value::{Dict, Value};

/// Emit a complete Zinc grid document, including its trailing newline.
pub fn emit_grid(grid: &Grid) -> String {
    let mut out = String::new();
    out.push_str("ver:\"3.0\"");
    out.push_str(&emit_tag_list(grid.meta(), &["ver"]));
    out.push('\n');

    let col_strs: Vec<String> = grid
        .cols()
        .iter()
        .map(|col| format!("{}{}", col.name().as_str(), emit_tag_list(col.meta(), &[])))
        .collect();
    out.push_str(&col_strs.join(","));
    out.push('\n');

    for row in grid.rows() {
        let cells: Vec<String> = grid
            .cols()
            .iter()
            .map(|col| {
                row.get(col.name().as_str())
                    .map(emit_scalar)
                    .unwrap_or_default()
            })
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }

    out
}

/// Emit `(WS id (":" scalar)?)*` for every tag in `meta` not in `skip`.
fn emit_tag_list(meta: &Dict, skip: &[&str]) -> String {
    let mut out = String::new();
    for (key, value) in meta.iter() {
        if skip.contains(&key) {
            continue;
        }
        out.push(' ');
        out.push_str(key);
        if !matches!(value, Value::Marker) {
            out.push(':');
            out.push_str(&emit_scalar(value));
        }
    }
    out
}

/// Emit a single scalar in Zinc literal form, the inverse of the parser's
/// `scan_scalar`. Used both for grid cells and by `Value`'s `Display` impl.
pub fn emit_scalar(value: &Value) -> String {
    match value {
        Value::Null => "N".to_owned(),
        Value::Marker => "M".to_owned(),
        Value::Remove => "R".to_owned(),
        Value::Na => "NA".to_owned(),
        Value::Bool(true) => "T".to_owned(),
        Value::Bool(false) => "F".to_owned(),
        Value::Number(n) => n.to_zinc_string(),
        Value::Str(s) => format!("\"{}\"", escape_str(s)),
        Value::Uri(s) => format!("`{}`", s),
        Value::Ref(r) => r.to_zinc_string(),
        Value::Bin(mime) => format!("Bin({})", mime),
        Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        Value::Time(t) => emit_time(t),
        Value::DateTime(dt, zone) => {
            format!("{} {}", dt.format("%Y-%m-%dT%H:%M:%S%.3f%:z"), zone)
        }
        Value::Coord(c) => c.to_zinc_string(),
        Value::XStr(name, val) => format!("{}(\"{}\")", name, escape_str(val)),
        Value::List(items) => {
            let inner: Vec<String> = items.iter().map(emit_scalar).collect();
            format!("[{}]", inner.join(","))
        }
        Value::Dict(d) => format!("{{{}}}", emit_tag_list(d, &[]).trim_start()),
        Value::Grid(g) => format!("<<{}>>", emit_grid(g)),
    }
}

fn emit_time(t: &chrono::NaiveTime) -> String {
    if t.nanosecond() == 0 {
        t.format("%H:%M:%S").to_string()
    } else {
        t.format("%H:%M:%S%.3f").to_string()
    }
}

use chrono::Timelike;

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::Number;

    #[test]
    fn emit_marker_and_bool() {
        assert_eq!(emit_scalar(&Value::Marker), "M");
        assert_eq!(emit_scalar(&Value::Bool(true)), "T");
        assert_eq!(emit_scalar(&Value::Bool(false)), "F");
    }

    #[test]
    fn emit_number_with_unit() {
        let n = Number::new(45.5, Some("kg".to_owned()));
        assert_eq!(emit_scalar(&Value::Number(n)), "45.5kg");
    }

    #[test]
    fn emit_string_escapes() {
        assert_eq!(emit_scalar(&Value::str("a\nb")), "\"a\\nb\"");
    }

    #[test]
    fn emit_list() {
        let v = Value::List(vec![Value::Marker, Value::Bool(false)]);
        assert_eq!(emit_scalar(&v), "[M,F]");
    }

    #[test]
    fn emit_dict_bare_marker() {
        let d = Dict::new().with("cur", Value::Marker);
        assert_eq!(emit_scalar(&Value::Dict(d)), "{cur}");
    }
}
