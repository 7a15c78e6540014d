//! The Hayson-style JSON codec (spec §4.D): scalars that aren't plain JSON
//! primitives are encoded as a string with a two-character sigil prefix.
//! Plain JSON strings decode as `Value::Str` — a bare string that happens
//! to start with a reserved sigil is a known, accepted ambiguity of this
//! encoding, not a bug.

use super::error::CodecError;
use crate::grid::{Column, Grid};
use crate::value::{Coord, Dict, Number, Ref, TagName, Value};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde_json::{Map, Value as Json};

pub fn encode_grid(grid: &Grid) -> Json {
    let mut top = Map::new();
    top.insert("meta".to_owned(), encode_dict(grid.meta()));

    let cols: Vec<Json> = grid
        .cols()
        .iter()
        .map(|col| encode_col(col))
        .collect();
    top.insert("cols".to_owned(), Json::Array(cols));

    let rows: Vec<Json> = grid.rows().iter().map(encode_dict).collect();
    top.insert("rows".to_owned(), Json::Array(rows));

    Json::Object(top)
}

fn encode_col(col: &Column) -> Json {
    let mut obj = Map::new();
    obj.insert("name".to_owned(), Json::String(col.name().as_str().to_owned()));
    for (k, v) in col.meta().iter() {
        obj.insert(k.to_owned(), encode_value(v));
    }
    Json::Object(obj)
}

fn encode_dict(dict: &Dict) -> Json {
    let mut obj = Map::new();
    for (k, v) in dict.iter() {
        obj.insert(k.to_owned(), encode_value(v));
    }
    Json::Object(obj)
}

pub fn encode_value(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Marker => Json::String("m:".to_owned()),
        Value::Remove => Json::String("-:".to_owned()),
        Value::Na => Json::String("z:".to_owned()),
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => Json::String(n.to_encoded_json_string()),
        Value::Str(s) => Json::String(s.clone()),
        Value::Uri(s) => Json::String(format!("u:{}", s)),
        Value::Ref(r) => Json::String(r.to_encoded_json_string()),
        Value::Bin(mime) => Json::String(format!("b:{}", mime)),
        Value::Date(d) => Json::String(format!("d:{}", d.format("%Y-%m-%d"))),
        Value::Time(t) => Json::String(format!("h:{}", format_time(t))),
        Value::DateTime(dt, zone) => Json::String(format!(
            "t:{} {}",
            dt.format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
            zone
        )),
        Value::Coord(c) => Json::String(c.to_encoded_json_string()),
        Value::XStr(name, val) => Json::String(format!("x:{}:{}", name, val)),
        Value::List(items) => Json::Array(items.iter().map(encode_value).collect()),
        Value::Dict(d) => encode_dict(d),
        Value::Grid(g) => encode_grid(g),
    }
}

fn format_time(t: &NaiveTime) -> String {
    use chrono::Timelike;
    if t.nanosecond() == 0 {
        t.format("%H:%M:%S").to_string()
    } else {
        t.format("%H:%M:%S%.3f").to_string()
    }
}

pub fn decode_grid(json: &Json) -> Result<Grid, CodecError> {
    tracing::trace!("decoding json grid");
    let obj = json
        .as_object()
        .ok_or_else(|| CodecError::Json("top-level grid value must be an object".to_owned()))?;

    let meta = match obj.get("meta") {
        Some(Json::Object(_)) => decode_dict(obj.get("meta").unwrap())?,
        _ => Dict::new(),
    };

    let mut cols = Vec::new();
    if let Some(Json::Array(col_list)) = obj.get("cols") {
        for col_json in col_list {
            let col_obj = col_json
                .as_object()
                .ok_or_else(|| CodecError::Json("column entry must be an object".to_owned()))?;
            let name = col_obj
                .get("name")
                .and_then(Json::as_str)
                .ok_or_else(|| CodecError::Json("column entry missing 'name'".to_owned()))?;
            let tag = TagName::new(name.to_owned())
                .map_err(|_| CodecError::Json(format!("'{}' is not a valid column name", name)))?;
            let mut col_meta = Dict::new();
            for (k, v) in col_obj {
                if k != "name" {
                    col_meta.insert(k.clone(), decode_value(v)?);
                }
            }
            cols.push(Column::new(tag, col_meta));
        }
    }

    let mut rows = Vec::new();
    if let Some(Json::Array(row_list)) = obj.get("rows") {
        for row_json in row_list {
            rows.push(decode_dict(row_json)?);
        }
    }

    Grid::new(meta, cols, rows).map_err(CodecError::from)
}

fn decode_dict(json: &Json) -> Result<Dict, CodecError> {
    let obj = json
        .as_object()
        .ok_or_else(|| CodecError::Json("expected a JSON object for a Dict".to_owned()))?;
    let mut dict = Dict::new();
    for (k, v) in obj {
        dict.insert(k.clone(), decode_value(v)?);
    }
    Ok(dict)
}

pub fn decode_value(json: &Json) -> Result<Value, CodecError> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => Ok(Value::Number(Number::new(
            n.as_f64().unwrap_or(f64::NAN),
            None,
        ))),
        Json::String(s) => decode_scalar_string(s),
        Json::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(decode_value(item)?);
            }
            Ok(Value::List(values))
        }
        Json::Object(obj) => {
            if obj.contains_key("cols") && obj.contains_key("rows") {
                Ok(Value::Grid(Box::new(decode_grid(json)?)))
            } else {
                Ok(Value::Dict(decode_dict(json)?))
            }
        }
    }
}

fn decode_scalar_string(s: &str) -> Result<Value, CodecError> {
    if s == "m:" {
        return Ok(Value::Marker);
    }
    if s == "-:" {
        return Ok(Value::Remove);
    }
    if s == "z:" {
        return Ok(Value::Na);
    }
    if let Some(rest) = s.strip_prefix("n:") {
        return Number::from_encoded_json_string(&format!("n:{}", rest))
            .map(Value::Number)
            .map_err(|e| CodecError::Json(e.to_string()));
    }
    if let Some(rest) = s.strip_prefix("r:") {
        return Ref::from_encoded_json_string(&format!("r:{}", rest))
            .map(Value::Ref)
            .map_err(|e| CodecError::Json(e.to_string()));
    }
    if let Some(rest) = s.strip_prefix("u:") {
        return Ok(Value::Uri(rest.to_owned()));
    }
    if let Some(rest) = s.strip_prefix("b:") {
        return Ok(Value::Bin(rest.to_owned()));
    }
    if let Some(rest) = s.strip_prefix("d:") {
        let date = NaiveDate::parse_from_str(rest, "%Y-%m-%d")
            .map_err(|e| CodecError::Json(e.to_string()))?;
        return Ok(Value::Date(date));
    }
    if let Some(rest) = s.strip_prefix("h:") {
        let time = NaiveTime::parse_from_str(rest, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(rest, "%H:%M:%S"))
            .map_err(|e| CodecError::Json(e.to_string()))?;
        return Ok(Value::Time(time));
    }
    if let Some(rest) = s.strip_prefix("t:") {
        let mut parts = rest.splitn(2, ' ');
        let instant = parts
            .next()
            .ok_or_else(|| CodecError::Json(format!("malformed datetime '{}'", rest)))?;
        let zone = parts
            .next()
            .ok_or_else(|| CodecError::Json(format!("datetime '{}' is missing its zone", rest)))?;
        let dt = DateTime::parse_from_rfc3339(instant)
            .map_err(|e| CodecError::Json(e.to_string()))?;
        return Ok(Value::DateTime(dt, zone.to_owned()));
    }
    if let Some(rest) = s.strip_prefix("c:") {
        return Coord::from_zinc_str(rest)
            .map(Value::Coord)
            .map_err(|e| CodecError::Json(e.to_string()));
    }
    if let Some(rest) = s.strip_prefix("x:") {
        let mut parts = rest.splitn(2, ':');
        let name = parts
            .next()
            .ok_or_else(|| CodecError::Json(format!("malformed xstr '{}'", rest)))?;
        let val = parts.next().unwrap_or_default();
        return Ok(Value::XStr(name.to_owned(), val.to_owned()));
    }
    Ok(Value::Str(s.to_owned()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn number_with_unit_round_trips() {
        let value = Value::Number(Number::new(154.0, Some("kg".to_owned())));
        let json = encode_value(&value);
        assert_eq!(json, Json::String("n:154 kg".to_owned()));
        assert_eq!(decode_value(&json).unwrap(), value);
    }

    #[test]
    fn marker_round_trips() {
        let json = encode_value(&Value::Marker);
        assert_eq!(decode_value(&json).unwrap(), Value::Marker);
    }

    #[test]
    fn plain_string_has_no_sigil() {
        let json = encode_value(&Value::str("hello"));
        assert_eq!(json, Json::String("hello".to_owned()));
    }

    #[test]
    fn grid_round_trips() {
        let rows = vec![Dict::new().with("id", Value::str("a")).with("n", Value::Number(Number::new(1.0, None)))];
        let grid = Grid::from_rows(rows).unwrap();
        let json = encode_grid(&grid);
        let decoded = decode_grid(&json).unwrap();
        assert_eq!(grid, decoded);
    }
}
