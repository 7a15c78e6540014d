//! Dialect abstraction for the filter→SQL translator (spec §4.G): three
//! points of variation — identifier quoting, JSON-extract syntax, and
//! whether `UNION`/`INTERSECT` may appear parenthesised inside a subquery.

use std::fmt::Debug;

pub trait SqlDialect: Debug {
    fn name(&self) -> &'static str;

    /// Quote a table or column identifier.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal for inline (non-bound) use.
    fn quote_string(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// Build a JSON-extract expression over `column` for the dotted tag
    /// path `tag` (no leading `$.`), e.g. `site` or `geo->city`.
    fn json_extract(&self, column: &str, tag: &str) -> String;

    /// Whether this dialect allows `UNION`/`INTERSECT` to appear inside
    /// parentheses within a subquery. SQLite does not (spec §4.G "Known
    /// limitation"); PostgreSQL does.
    fn supports_parenthesized_set_ops(&self) -> bool;
}
