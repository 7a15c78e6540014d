//! Compiles a filter AST into a parameterised `WHERE` clause (spec §4.G).
//! Single-hop paths compile to a direct JSON-extract predicate on the
//! `entity` column; a `->` hop compiles to a correlated `EXISTS` subquery
//! against the same table, since the translator has no in-memory ref
//! index to draw on — the chain must be resolved by the database.

use crate::filter::{CmpOp, FilterNode, Path};
use crate::value::{Number, Value};

use super::dialect::SqlDialect;

/// A single `?`-style bind parameter. Kept typed (rather than always a
/// string) so numeric range comparisons can bind a `REAL` instead of the
/// sigil-encoded text used for exact-match predicates.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    Text(String),
    Real(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Translation {
    pub where_clause: String,
    pub binds: Vec<SqlParam>,
    /// Non-fatal notices about constructs the translator could not
    /// compile exactly (spec §4.G "Known limitation") — callers should
    /// surface these, not silently trust the SQL as a perfect rewrite.
    pub warnings: Vec<String>,
}

/// Translate `ast` into a `WHERE`-clause body (no leading `WHERE`) against
/// `table`'s `entity` JSON column.
pub fn translate(ast: &FilterNode, dialect: &dyn SqlDialect, table: &str) -> Translation {
    tracing::trace!("translating filter to {} SQL for table {table}", dialect.name());
    let mut binds = Vec::new();
    let mut warnings = Vec::new();
    let where_clause = compile(ast, dialect, table, "entity", &mut binds, &mut warnings);
    for warning in &warnings {
        tracing::debug!("sql translation warning: {warning}");
    }
    Translation {
        where_clause,
        binds,
        warnings,
    }
}

fn compile(
    node: &FilterNode,
    dialect: &dyn SqlDialect,
    table: &str,
    column: &str,
    binds: &mut Vec<SqlParam>,
    warnings: &mut Vec<String>,
) -> String {
    match node {
        FilterNode::And(lhs, rhs) => format!(
            "({}) AND ({})",
            compile(lhs, dialect, table, column, binds, warnings),
            compile(rhs, dialect, table, column, binds, warnings)
        ),
        FilterNode::Or(lhs, rhs) => {
            if !dialect.supports_parenthesized_set_ops() && involves_ref_hop(lhs, rhs) {
                warnings.push(format!(
                    "{} cannot parenthesise UNION/INTERSECT; this OR across ref hops \
                     may degrade to a superset match that must be verified in-process",
                    dialect.name()
                ));
            }
            format!(
                "({}) OR ({})",
                compile(lhs, dialect, table, column, binds, warnings),
                compile(rhs, dialect, table, column, binds, warnings)
            )
        }
        FilterNode::Not(inner) => format!(
            "NOT ({})",
            compile(inner, dialect, table, column, binds, warnings)
        ),
        FilterNode::Has(path) => {
            compile_path(path, None, dialect, table, column, binds, warnings)
        }
        FilterNode::Cmp(path, op, rhs) => {
            compile_path(path, Some((*op, rhs)), dialect, table, column, binds, warnings)
        }
    }
}

fn involves_ref_hop(lhs: &FilterNode, rhs: &FilterNode) -> bool {
    fn has_multi_hop(node: &FilterNode) -> bool {
        match node {
            FilterNode::And(a, b) | FilterNode::Or(a, b) => has_multi_hop(a) || has_multi_hop(b),
            FilterNode::Not(a) => has_multi_hop(a),
            FilterNode::Has(p) => p.hops().len() > 1,
            FilterNode::Cmp(p, _, _) => p.hops().len() > 1,
        }
    }
    has_multi_hop(lhs) || has_multi_hop(rhs)
}

/// Compile a (possibly multi-hop) path plus an optional trailing
/// comparison into a predicate on `{table}.{column}`.
fn compile_path(
    path: &Path,
    cmp: Option<(CmpOp, &Value)>,
    dialect: &dyn SqlDialect,
    table: &str,
    column: &str,
    binds: &mut Vec<SqlParam>,
    warnings: &mut Vec<String>,
) -> String {
    let hops = path.hops();
    if hops.len() == 1 {
        return compile_leaf(&hops[0], cmp, dialect, table, column, binds);
    }

    // Multi-hop: resolve the first hop as a ref against a fresh alias of
    // the same table, then recurse on the remaining hops there (spec
    // §4.G "a->b: two-step ... inner SELECT resolves the ref value").
    let alias = format!("{}_ref{}", table, hops.len());
    let extracted = dialect.json_extract(&format!("{}.{}", table, column), &hops[0]);
    let rest = Path(hops[1..].to_vec());
    let inner_predicate = compile_path(
        &rest,
        cmp,
        dialect,
        &alias,
        column,
        binds,
        warnings,
    );
    let id_extract = dialect.json_extract(&format!("{}.{}", alias, column), "id");
    format!(
        "EXISTS (SELECT 1 FROM {table} AS {alias} WHERE {id_extract} = {extracted} AND {inner})",
        table = dialect.quote_identifier(table),
        alias = alias,
        id_extract = id_extract,
        extracted = extracted,
        inner = inner_predicate
    )
}

fn compile_leaf(
    tag: &str,
    cmp: Option<(CmpOp, &Value)>,
    dialect: &dyn SqlDialect,
    table: &str,
    column: &str,
    binds: &mut Vec<SqlParam>,
) -> String {
    let extracted = dialect.json_extract(&format!("{}.{}", table, column), tag);

    match cmp {
        None => format!("{0} IS NOT NULL AND {0} <> 'false'", extracted),
        Some((CmpOp::Eq, rhs)) => {
            binds.push(SqlParam::Text(encode_sql_literal(rhs)));
            format!("{} = ?", extracted)
        }
        Some((CmpOp::Ne, rhs)) => {
            binds.push(SqlParam::Text(encode_sql_literal(rhs)));
            format!("{} <> ?", extracted)
        }
        Some((op @ (CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge), Value::Number(n))) => {
            compile_number_range(op, n, &extracted, binds)
        }
        Some((op, rhs)) => {
            binds.push(SqlParam::Text(encode_sql_literal(rhs)));
            format!("{} {} ?", extracted, op_str(op))
        }
    }
}

/// Numeric range comparisons strip the `n:` sigil and cast to `REAL`
/// (spec §8 scenario 5), with an additional `LIKE` guard on the unit
/// suffix so e.g. `50ft2` never matches a differently-unitted quantity.
fn compile_number_range(
    op: CmpOp,
    n: &Number,
    extracted: &str,
    binds: &mut Vec<SqlParam>,
) -> String {
    if !n.has_known_unit() {
        tracing::debug!("sql translation: '{}' is not a recognised unit symbol", n.unit().unwrap_or(""));
    }
    binds.push(SqlParam::Real(n.value()));
    let cast = format!("CAST(SUBSTR({},3) AS REAL)", extracted);
    let range_predicate = format!("{} {} ?", cast, op_str(op));
    match n.unit() {
        Some(unit) => format!("{} AND {} LIKE '%{}'", range_predicate, extracted, unit),
        None => range_predicate,
    }
}

fn op_str(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Eq => "=",
        CmpOp::Ne => "<>",
        CmpOp::Lt => "<",
        CmpOp::Le => "<=",
        CmpOp::Gt => ">",
        CmpOp::Ge => ">=",
    }
}

/// Encode a scalar the way it is assumed to be stored in the persisted
/// `entity` JSON column: every scalar carries its sigil, including
/// strings (`s:text`) — a stricter encoding than the wire-format JSON
/// codec's bare-string convention, chosen so a plain JSON equality
/// comparison can never confuse a string value with another sigil form.
fn encode_sql_literal(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("s:{}", s),
        Value::Number(n) => n.to_encoded_json_string(),
        Value::Bool(b) => b.to_string(),
        other => match crate::codec::json::encode_value(other) {
            serde_json::Value::String(s) => s,
            json => json.to_string(),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::filter::parse_filter;
    use crate::sql::Sqlite;

    #[test]
    fn has_predicate() {
        let ast = parse_filter("site").unwrap();
        let t = translate(&ast, &Sqlite, "points");
        assert_eq!(
            t.where_clause,
            "json_extract(points.entity,'$.site') IS NOT NULL AND json_extract(points.entity,'$.site') <> 'false'"
        );
    }

    #[test]
    fn eq_predicate_binds_sigil_encoded_string() {
        let ast = parse_filter("tag == \"s\"").unwrap();
        let t = translate(&ast, &Sqlite, "points");
        assert_eq!(t.where_clause, "json_extract(points.entity,'$.tag') = ?");
        assert_eq!(t.binds, vec![SqlParam::Text("s:s".to_owned())]);
    }

    #[test]
    fn range_predicate_casts_and_checks_unit() {
        let ast = parse_filter("area >= 50ft2").unwrap();
        let t = translate(&ast, &Sqlite, "points");
        assert!(t.where_clause.contains("CAST(SUBSTR"));
        assert!(t.where_clause.contains("LIKE '%ft2'"));
        assert_eq!(t.binds, vec![SqlParam::Real(50.0)]);
    }

    #[test]
    fn and_or_are_parenthesised() {
        let ast = parse_filter("a and b or c").unwrap();
        let t = translate(&ast, &Sqlite, "points");
        assert!(t.where_clause.starts_with('('));
    }

    #[test]
    fn multi_hop_path_emits_exists_subquery() {
        let ast = parse_filter("siteRef->geoCity == \"Richmond\"").unwrap();
        let t = translate(&ast, &Sqlite, "points");
        assert!(t.where_clause.starts_with("EXISTS"));
    }
}
