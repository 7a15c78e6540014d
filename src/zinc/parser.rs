//! Recursive-descent parser for Zinc v3 (spec §4.C). The grammar:
//!
//! ```text
//! grid      := "ver:" string metadata? NL cols NL row*
//! cols      := colDef ("," colDef)*
//! colDef    := id metadata?
//! metadata  := (WS id (":" scalar)?)+
//! row       := cell ("," cell)*
//! cell      := ε | scalar
//! scalar    := null | marker | remove | NA | bool | number | str | uri
//!            | ref | bin | date | time | dateTime | coord | xstr
//!            | list | dict | "<<" grid ">>"
//! ```
//!
//! Grids may nest (`<<...>>` cells), so `parse_grid` is reentrant: a
//! nested-grid cell recursively invokes `parse_grid` on its inner text.

use super::error::{ErrorKind, ParseError};
use super::lexer::{split_logical_lines, split_top_level, unescape_str, Cursor};
use crate::grid::{Column, Grid};
use crate::value::{Coord, Dict, Number, Ref, TagName, Value};
use chrono::{DateTime, NaiveDate, NaiveTime};

/// Parse a complete Zinc document into a `Grid`.
pub fn parse_grid(text: &str) -> Result<Grid, ParseError> {
    let lines = split_logical_lines(text.trim_end_matches('\n'));
    let mut lines = lines.into_iter().enumerate();

    let (header_no, header_line) = lines.next().ok_or_else(|| {
        ParseError::new(1, 1, ErrorKind::UnexpectedToken {
            found: "<empty input>".to_owned(),
            expected: "a 'ver:' header line".to_owned(),
        })
    })?;
    let meta = parse_header(header_line, header_no + 1)?;

    let (cols_no, cols_line) = lines.next().ok_or_else(|| {
        ParseError::new(
            header_no + 2,
            1,
            ErrorKind::UnexpectedToken {
                found: "<end of input>".to_owned(),
                expected: "a column definition line".to_owned(),
            },
        )
    })?;
    let cols = parse_cols(cols_line, cols_no + 1)?;

    let mut rows = Vec::new();
    for (row_no, row_line) in lines {
        if row_line.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(row_line, row_no + 1, &cols)?);
    }

    Grid::new(meta, cols, rows).map_err(|e| {
        ParseError::new(
            1,
            1,
            ErrorKind::DuplicateColumn {
                name: e.to_string(),
            },
        )
    })
}

fn parse_header(line: &str, line_no: usize) -> Result<Dict, ParseError> {
    let mut cursor = Cursor::new(line, line_no);
    cursor.skip_ws();
    let tag = cursor.take_while(|c| c.is_ascii_alphabetic());
    if tag != "ver" {
        return Err(cursor.error(ErrorKind::UnexpectedToken {
            found: tag,
            expected: "'ver:'".to_owned(),
        }));
    }
    if !cursor.eat(':') {
        return Err(cursor.error(ErrorKind::UnexpectedToken {
            found: cursor.remainder(),
            expected: "':'".to_owned(),
        }));
    }
    let version = scan_quoted_string(&mut cursor)?;
    if version != "2.0" && version != "3.0" {
        return Err(cursor.error(ErrorKind::UnknownScalar {
            text: format!("ver:\"{}\"", version),
        }));
    }

    let mut meta = Dict::new();
    meta.insert("ver", Value::Str(version));
    parse_tag_list(&mut cursor, &mut meta)?;
    Ok(meta)
}

/// Parses `(WS id (":" scalar)?)+` into `dict`, stopping at end of input.
fn parse_tag_list(cursor: &mut Cursor, dict: &mut Dict) -> Result<(), ParseError> {
    loop {
        cursor.skip_ws();
        if cursor.is_eof() {
            return Ok(());
        }
        let name = cursor.take_while(|c| c.is_ascii_alphanumeric());
        if name.is_empty() {
            return Err(cursor.error(ErrorKind::UnexpectedToken {
                found: cursor.remainder(),
                expected: "a tag name".to_owned(),
            }));
        }
        let value = if cursor.eat(':') {
            scan_scalar(cursor)?
        } else {
            Value::Marker
        };
        dict.insert(name, value);
    }
}

fn parse_cols(line: &str, line_no: usize) -> Result<Vec<Column>, ParseError> {
    let mut cols = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for cell in split_top_level(line, ',') {
        let mut cursor = Cursor::new(cell.trim(), line_no);
        let name = cursor.take_while(|c| c.is_ascii_alphanumeric());
        if name.is_empty() {
            return Err(cursor.error(ErrorKind::UnexpectedToken {
                found: cursor.remainder(),
                expected: "a column name".to_owned(),
            }));
        }
        if !seen.insert(name.clone()) {
            return Err(cursor.error(ErrorKind::DuplicateColumn { name }));
        }
        let tag = TagName::new(name.clone()).map_err(|_| {
            cursor.error(ErrorKind::UnexpectedToken {
                found: name.clone(),
                expected: "a valid tag name".to_owned(),
            })
        })?;
        let mut meta = Dict::new();
        parse_tag_list(&mut cursor, &mut meta)?;
        cols.push(Column::new(tag, meta));
    }
    Ok(cols)
}

fn parse_row(line: &str, line_no: usize, cols: &[Column]) -> Result<Dict, ParseError> {
    let cells = split_top_level(line, ',');
    if cells.len() > cols.len() {
        return Err(ParseError::new(
            line_no,
            1,
            ErrorKind::UnexpectedToken {
                found: format!("{} cells", cells.len()),
                expected: format!("at most {} cells", cols.len()),
            },
        ));
    }
    let mut row = Dict::new();
    for (col, cell) in cols.iter().zip(cells.iter()) {
        let value = parse_scalar(cell.trim(), line_no)?;
        row.insert(col.name().as_str(), value);
    }
    Ok(row)
}

/// Parse a single, complete scalar cell (used for row cells and for
/// list/dict literal elements, where the text has already been isolated
/// by [`split_top_level`]).
pub fn parse_scalar(s: &str, line_no: usize) -> Result<Value, ParseError> {
    let mut cursor = Cursor::new(s, line_no);
    cursor.skip_ws();
    if cursor.is_eof() {
        return Ok(Value::Null);
    }
    let value = scan_scalar(&mut cursor)?;
    cursor.skip_ws();
    if !cursor.is_eof() {
        return Err(cursor.error(ErrorKind::UnexpectedToken {
            found: cursor.remainder(),
            expected: "end of cell".to_owned(),
        }));
    }
    Ok(value)
}

/// Scan exactly one scalar starting at the cursor's current position,
/// advancing the cursor past it and leaving any trailing content (e.g. the
/// next tag in a metadata list) untouched.
fn scan_scalar(cursor: &mut Cursor) -> Result<Value, ParseError> {
    match cursor.peek() {
        Some('"') => Ok(Value::Str(scan_quoted_string(cursor)?)),
        Some('`') => Ok(Value::Uri(scan_backtick_string(cursor)?)),
        Some('@') => scan_ref(cursor),
        Some('[') => scan_list(cursor),
        Some('{') => scan_dict(cursor),
        Some('<') if cursor.peek_at(1) == Some('<') => scan_nested_grid(cursor),
        _ => scan_word_scalar(cursor),
    }
}

fn scan_quoted_string(cursor: &mut Cursor) -> Result<String, ParseError> {
    if !cursor.eat('"') {
        return Err(cursor.error(ErrorKind::UnexpectedToken {
            found: cursor.remainder(),
            expected: "'\"'".to_owned(),
        }));
    }
    let mut body = String::new();
    loop {
        match cursor.advance() {
            Some('"') => break,
            Some('\\') => {
                body.push('\\');
                match cursor.advance() {
                    Some(c) => body.push(c),
                    None => return Err(cursor.error(ErrorKind::UnterminatedString)),
                }
            }
            Some(c) => body.push(c),
            None => return Err(cursor.error(ErrorKind::UnterminatedString)),
        }
    }
    unescape_str(&body).map_err(|kind| cursor.error(kind))
}

fn scan_backtick_string(cursor: &mut Cursor) -> Result<String, ParseError> {
    cursor.advance(); // consume opening `
    let mut body = String::new();
    loop {
        match cursor.advance() {
            Some('`') => break,
            Some(c) => body.push(c),
            None => return Err(cursor.error(ErrorKind::UnterminatedString)),
        }
    }
    Ok(body)
}

fn scan_ref(cursor: &mut Cursor) -> Result<Value, ParseError> {
    cursor.advance(); // consume '@'
    let name = cursor.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'));
    let mut display = None;
    let save_pos = (cursor.peek(), cursor.peek_at(1));
    if save_pos.0 == Some(' ') && save_pos.1 == Some('"') {
        cursor.advance();
        display = Some(scan_quoted_string(cursor)?);
    }
    let r = Ref::new(name, display)
        .map_err(|e| cursor.error(ErrorKind::UnknownScalar { text: e.to_string() }))?;
    Ok(Value::Ref(r))
}

fn scan_list(cursor: &mut Cursor) -> Result<Value, ParseError> {
    let inner = scan_bracketed(cursor, '[', ']')?;
    let items = split_top_level(&inner, ',');
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        values.push(parse_scalar(trimmed, cursor.line_no())?);
    }
    Ok(Value::List(values))
}

fn scan_dict(cursor: &mut Cursor) -> Result<Value, ParseError> {
    let inner = scan_bracketed(cursor, '{', '}')?;
    let mut dict = Dict::new();
    for entry in split_top_level(&inner, ',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let mut entry_cursor = Cursor::new(entry, cursor.line_no());
        let name = entry_cursor.take_while(|c| c.is_ascii_alphanumeric());
        let value = if entry_cursor.eat(':') {
            scan_scalar(&mut entry_cursor)?
        } else {
            Value::Marker
        };
        dict.insert(name, value);
    }
    Ok(Value::Dict(dict))
}

fn scan_nested_grid(cursor: &mut Cursor) -> Result<Value, ParseError> {
    cursor.advance();
    cursor.advance(); // consume "<<"
    let mut depth = 1i32;
    let mut inner = String::new();
    loop {
        if cursor.peek() == Some('<') && cursor.peek_at(1) == Some('<') {
            depth += 1;
            inner.push('<');
            inner.push('<');
            cursor.advance();
            cursor.advance();
            continue;
        }
        if cursor.peek() == Some('>') && cursor.peek_at(1) == Some('>') {
            depth -= 1;
            cursor.advance();
            cursor.advance();
            if depth == 0 {
                break;
            }
            inner.push('>');
            inner.push('>');
            continue;
        }
        match cursor.advance() {
            Some(c) => inner.push(c),
            None => return Err(cursor.error(ErrorKind::UnterminatedString)),
        }
    }
    let nested = parse_grid(&inner)?;
    Ok(Value::Grid(Box::new(nested)))
}

/// Scan a `[`/`{`-delimited span, returning its inner text (the delimiters
/// themselves are not included).
fn scan_bracketed(cursor: &mut Cursor, open: char, close: char) -> Result<String, ParseError> {
    if !cursor.eat(open) {
        return Err(cursor.error(ErrorKind::UnexpectedToken {
            found: cursor.remainder(),
            expected: open.to_string(),
        }));
    }
    let mut depth = 1i32;
    let mut inner = String::new();
    let mut in_quotes = false;
    loop {
        match cursor.peek() {
            Some('"') => {
                in_quotes = !in_quotes;
                inner.push('"');
                cursor.advance();
            }
            Some(c) if in_quotes => {
                inner.push(c);
                cursor.advance();
                if c == '\\' {
                    if let Some(escaped) = cursor.advance() {
                        inner.push(escaped);
                    }
                }
            }
            Some(c) if c == open => {
                depth += 1;
                inner.push(c);
                cursor.advance();
            }
            Some(c) if c == close => {
                depth -= 1;
                cursor.advance();
                if depth == 0 {
                    break;
                }
                inner.push(c);
            }
            Some(c) => {
                inner.push(c);
                cursor.advance();
            }
            None => return Err(cursor.error(ErrorKind::UnterminatedString)),
        }
    }
    Ok(inner)
}

/// Scan any scalar whose literal form is a run of non-whitespace
/// characters (number, bool, marker/null/remove/NA, date, time, datetime's
/// date+time+offset part, coord, bin, xstr) and dispatch on its shape.
/// DateTime additionally consumes a following zone-name token.
fn scan_word_scalar(cursor: &mut Cursor) -> Result<Value, ParseError> {
    let token = cursor.take_while(|c| !c.is_whitespace() && c != ',');
    if token.is_empty() {
        return Err(cursor.error(ErrorKind::UnexpectedToken {
            found: cursor.remainder(),
            expected: "a scalar".to_owned(),
        }));
    }

    match token.as_str() {
        "N" => return Ok(Value::Null),
        "M" => return Ok(Value::Marker),
        "R" => return Ok(Value::Remove),
        "NA" => return Ok(Value::Na),
        "T" => return Ok(Value::Bool(true)),
        "F" => return Ok(Value::Bool(false)),
        _ => {}
    }

    if looks_like_date(&token) {
        if token.len() > 10 && token.as_bytes()[10] == b'T' {
            return scan_date_time(cursor, &token);
        }
        let date = NaiveDate::parse_from_str(&token, "%Y-%m-%d")
            .map_err(|_| cursor.error(ErrorKind::UnknownScalar { text: token.clone() }))?;
        return Ok(Value::Date(date));
    }

    if looks_like_time(&token) {
        let time = parse_time_str(&token)
            .ok_or_else(|| cursor.error(ErrorKind::UnknownScalar { text: token.clone() }))?;
        return Ok(Value::Time(time));
    }

    if token.starts_with("C(") && token.ends_with(')') {
        let body = &token[2..token.len() - 1];
        let coord = Coord::from_zinc_str(body)
            .map_err(|_| cursor.error(ErrorKind::UnknownScalar { text: token.clone() }))?;
        return Ok(Value::Coord(coord));
    }

    if let Some(rest) = token.strip_prefix("Bin(") {
        if let Some(mime) = rest.strip_suffix(')') {
            return Ok(Value::Bin(mime.to_owned()));
        }
    }

    if token
        .chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
    {
        if let Some(paren) = token.find('(') {
            if token.ends_with(')') {
                let name = token[..paren].to_owned();
                let body = &token[paren + 1..token.len() - 1];
                let value = body.trim_matches('"').to_owned();
                return Ok(Value::XStr(name, value));
            }
        }
    }

    match Number::from_zinc_str(&token) {
        Ok(n) => Ok(Value::Number(n)),
        Err(_) => Err(cursor.error(ErrorKind::UnknownScalar { text: token })),
    }
}

fn looks_like_date(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 10
        && bytes[0..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

fn looks_like_time(token: &str) -> bool {
    let mut parts = token.split(':');
    match (parts.next(), parts.next()) {
        (Some(h), Some(m)) => {
            h.chars().all(|c| c.is_ascii_digit())
                && !h.is_empty()
                && m.chars().take(2).all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

fn parse_time_str(token: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(token, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(token, "%H:%M:%S"))
        .or_else(|_| NaiveTime::parse_from_str(token, "%H:%M"))
        .ok()
}

fn scan_date_time(cursor: &mut Cursor, first_token: &str) -> Result<Value, ParseError> {
    let dt = DateTime::parse_from_rfc3339(first_token).map_err(|_| {
        cursor.error(ErrorKind::BadNumber {
            text: first_token.to_owned(),
        })
    })?;

    cursor.skip_ws();
    let zone_pos_before = cursor.peek();
    let zone = cursor.take_while(|c| c.is_ascii_alphabetic() || c == '_' || c == '/');
    if zone.is_empty() || zone_pos_before.is_none() {
        return Err(cursor.error(ErrorKind::MissingTz {
            text: first_token.to_owned(),
        }));
    }
    let zone = match crate::tz::haystack_tz_string_to_tz(&zone) {
        Some(tz) => crate::tz::short_zone_name(&tz).to_owned(),
        None => {
            tracing::debug!("zinc: '{}' is not a recognised IANA zone name", zone);
            zone
        }
    };
    Ok(Value::DateTime(dt, zone))
}
