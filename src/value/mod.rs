//! The Haystack value algebra (spec §3.1): a closed, tagged sum of every
//! scalar and structured value a Grid cell can hold.

mod coord;
mod hsref;
mod number;
mod tag;

pub use coord::{Coord, ParseCoordError};
pub use hsref::{ParseRefError, Ref};
pub use number::{Number, ParseNumberError};
pub use tag::{is_tag_name, ParseTagNameError, TagName};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use std::fmt;

/// One Haystack value. Immutable once constructed; dispatch over the
/// variant is total (spec §9 "Polymorphism") — there is no open extension
/// point here, unlike `Provider`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Absent; distinct from `Remove`.
    Null,
    /// The presence-only marker, `M` in Zinc.
    Marker,
    /// A tombstone used in diffs; erases an entity-level tag.
    Remove,
    /// "Not available" sentinel.
    Na,
    Bool(bool),
    Number(Number),
    Str(String),
    /// A string tagged as a URI; has a distinct literal form from `Str`.
    Uri(String),
    Ref(Ref),
    /// A MIME-tagged binary payload reference (the MIME type only — the
    /// core ontology never carries binary bytes inline).
    Bin(String),
    Date(NaiveDate),
    /// Wall-clock time. Millisecond precision; sub-millisecond components
    /// are truncated on construction via `Value::time_from_hms_milli`.
    Time(NaiveTime),
    /// An instant plus the IANA zone name that produced its offset. The
    /// zone name is part of identity (spec §3.1).
    DateTime(DateTime<FixedOffset>, String),
    Coord(Coord),
    /// A named extension scalar carrying an encoded payload, e.g.
    /// `Type:value`.
    XStr(String, String),
    List(Vec<Value>),
    Dict(Dict),
    Grid(Box<crate::grid::Grid>),
}

impl Value {
    pub fn str<S: Into<String>>(s: S) -> Self {
        Value::Str(s.into())
    }

    pub fn number(value: f64, unit: Option<&str>) -> Self {
        Value::Number(Number::new(value, unit.map(|u| u.to_owned())))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Value::Marker)
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Value::Remove)
    }

    /// Haystack's "truthiness" for bare-path filter evaluation (spec §4.E):
    /// a value is "present" if it is neither `Null` nor a literal boolean
    /// `false`.
    pub fn is_present(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn as_ref_value(&self) -> Option<&Ref> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str_value(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::zinc::emitter::emit_scalar(self))
    }
}

/// An ordered mapping from tag name to `Value`. Insertion order is
/// preserved for deterministic output (spec §3.1), but `PartialEq` compares
/// dicts as plain mappings (order-independent), since a Dict's identity is
/// its key/value pairs, not the order they were added in.
#[derive(Clone, Debug, Default)]
pub struct Dict {
    entries: Vec<(String, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert a tag. If the key already exists, its value is overwritten
    /// in place (preserving its original position).
    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn with<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Remove the tag, returning its previous value if present. Used to
    /// apply a `Value::Remove` tombstone during `merge` (spec §4.I).
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if let Some(pos) = self.entries.iter().position(|(k, _)| k == key) {
            Some(self.entries.remove(pos).1)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl FromIterator<(String, Value)> for Dict {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut dict = Dict::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

use std::iter::FromIterator;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dict_equality_ignores_order() {
        let a = Dict::new().with("a", Value::Number(Number::new(1.0, None))).with(
            "b",
            Value::Marker,
        );
        let b = Dict::new().with("b", Value::Marker).with(
            "a",
            Value::Number(Number::new(1.0, None)),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn dict_insert_overwrites_in_place() {
        let mut d = Dict::new();
        d.insert("a", Value::Number(Number::new(1.0, None)));
        d.insert("b", Value::Marker);
        d.insert("a", Value::Number(Number::new(2.0, None)));

        let keys: Vec<&str> = d.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(d.get("a"), Some(&Value::Number(Number::new(2.0, None))));
    }

    #[test]
    fn marker_equality() {
        assert_eq!(Value::Marker, Value::Marker);
        assert_ne!(Value::Marker, Value::Bool(true));
    }

    #[test]
    fn is_present() {
        assert!(!Value::Null.is_present());
        assert!(!Value::Bool(false).is_present());
        assert!(Value::Bool(true).is_present());
        assert!(Value::Marker.is_present());
    }
}
