//! SQLite dialect (spec §4.G). SQLite's `json_extract` takes a JSON-path
//! string literal; it also disallows parenthesised `UNION`/`INTERSECT`
//! inside a subquery, the documented translator limitation.

use super::dialect::SqlDialect;

#[derive(Debug, Default)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn json_extract(&self, column: &str, tag: &str) -> String {
        format!("json_extract({},'$.{}')", column, tag)
    }

    fn supports_parenthesized_set_ops(&self) -> bool {
        false
    }
}
