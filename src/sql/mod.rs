//! Filter→SQL translator (spec §4.G): compiles a filter AST into a
//! parameterised `WHERE` clause over a JSON `entity` column, for at least
//! two dialects.

mod dialect;
mod postgres;
mod sqlite;
mod translate;

pub use dialect::SqlDialect;
pub use postgres::Postgres;
pub use sqlite::Sqlite;
pub use translate::{translate, SqlParam, Translation};
