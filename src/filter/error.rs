//! Filter parse errors (spec §4.E/§7): position-tagged, since filter
//! strings are short and a byte offset is enough context.

use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterParseError {
    pub pos: usize,
    pub expected: String,
}

impl fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at position {}: expected {}", self.pos, self.expected)
    }
}

impl std::error::Error for FilterParseError {}
