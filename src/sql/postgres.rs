//! PostgreSQL dialect (spec §4.G). PostgreSQL's native `->>` operator
//! extracts a JSON field as text, in place of SQLite's `json_extract`.

use super::dialect::SqlDialect;

#[derive(Debug, Default)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn json_extract(&self, column: &str, tag: &str) -> String {
        format!("{}->>'{}'", column, tag)
    }

    fn supports_parenthesized_set_ops(&self) -> bool {
        true
    }
}
