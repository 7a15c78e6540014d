//! Trio codec (spec §4.D): a line-oriented format, one entity per
//! paragraph separated by a blank line or `---`. Each line is
//! `tagName: zincScalar` or a bare `tagName` (Marker). Multi-line strings
//! use a two-space-indent continuation (the open-question resolution
//! noted in SPEC_FULL.md — the source format's space/tab mix is not
//! reproduced).

use super::error::CodecError;
use crate::grid::Grid;
use crate::value::{Dict, TagName, Value};
use crate::zinc::emitter::emit_scalar;

pub fn encode_trio(grid: &Grid) -> String {
    let entities: Vec<String> = grid.rows().iter().map(encode_entity).collect();
    entities.join("\n---\n")
}

fn encode_entity(row: &Dict) -> String {
    let mut lines = Vec::new();
    for (tag, value) in row.iter() {
        match value {
            Value::Marker => lines.push(tag.to_owned()),
            Value::Str(s) if s.contains('\n') => {
                lines.push(format!("{}:", tag));
                for line in s.split('\n') {
                    lines.push(format!("  {}", line));
                }
            }
            other => lines.push(format!("{}: {}", tag, emit_scalar(other))),
        }
    }
    lines.join("\n")
}

pub fn decode_trio(text: &str) -> Result<Grid, CodecError> {
    tracing::trace!("decoding {} bytes of trio", text.len());
    let mut rows = Vec::new();
    for paragraph in split_paragraphs(text) {
        if paragraph.iter().all(|l| l.trim().is_empty()) {
            continue;
        }
        rows.push(decode_entity(&paragraph)?);
    }
    Grid::from_rows(rows).map_err(CodecError::from)
}

/// Split into paragraphs on a blank line or a `---` line, dropping the
/// separator itself.
fn split_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim() == "---" || line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

fn decode_entity(lines: &[&str]) -> Result<Dict, CodecError> {
    let mut dict = Dict::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() {
            i += 1;
            continue;
        }
        if let Some((tag, rest)) = split_tag_line(line) {
            if rest.is_empty() {
                let mut body_lines = Vec::new();
                let mut j = i + 1;
                while j < lines.len() && lines[j].starts_with("  ") {
                    body_lines.push(&lines[j][2..]);
                    j += 1;
                }
                dict.insert(tag, Value::str(body_lines.join("\n")));
                i = j;
            } else {
                let value = crate::zinc::parse_scalar(rest).map_err(|e| CodecError::Trio {
                    line: i + 1,
                    msg: e.to_string(),
                })?;
                dict.insert(tag, value);
                i += 1;
            }
        } else {
            let name = line.trim();
            TagName::new(name.to_owned()).map_err(|_| CodecError::Trio {
                line: i + 1,
                msg: format!("'{}' is not a valid tag name", name),
            })?;
            dict.insert(name, Value::Marker);
            i += 1;
        }
    }
    Ok(dict)
}

/// Split a `tagName: rest` line; returns `None` for a bare marker line (no
/// colon).
fn split_tag_line(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let tag = &line[..colon];
    if !tag.chars().all(|c| c.is_ascii_alphanumeric()) || tag.is_empty() {
        return None;
    }
    Some((tag, line[colon + 1..].trim()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::Number;

    #[test]
    fn bare_tag_is_marker() {
        let grid = decode_trio("site\ndis: \"Carytown\"").unwrap();
        assert_eq!(grid.rows()[0].get("site"), Some(&Value::Marker));
        assert_eq!(grid.rows()[0].get("dis"), Some(&Value::str("Carytown")));
    }

    #[test]
    fn entities_separated_by_dashes() {
        let grid = decode_trio("id: @a\n---\nid: @b").unwrap();
        assert_eq!(grid.size(), 2);
    }

    #[test]
    fn entities_separated_by_blank_line() {
        let grid = decode_trio("id: @a\n\nid: @b").unwrap();
        assert_eq!(grid.size(), 2);
    }

    #[test]
    fn multiline_string_continuation() {
        let grid = decode_trio("dis:\n  line one\n  line two").unwrap();
        assert_eq!(
            grid.rows()[0].get("dis"),
            Some(&Value::str("line one\nline two"))
        );
    }

    #[test]
    fn round_trips_a_number() {
        let rows = vec![Dict::new()
            .with("id", Value::str("a"))
            .with("area", Value::Number(Number::new(100.0, Some("ft2".to_owned()))))];
        let grid = Grid::from_rows(rows).unwrap();
        let trio = encode_trio(&grid);
        let decoded = decode_trio(&trio).unwrap();
        assert_eq!(decoded.rows()[0].get("area"), grid.rows()[0].get("area"));
    }
}
