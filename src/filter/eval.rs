//! Filter evaluator (spec §4.F): evaluates an AST against a grid's rows,
//! in source order, with O(1) ref resolution via a prebuilt index. Never
//! errors on data; mistyped comparisons degrade to `false`.

use super::ast::{CmpOp, FilterNode, Path};
use crate::grid::{Grid, RefIndex};
use crate::value::{Dict, Value};

/// Evaluate `ast` against every row of `grid`, returning references to the
/// matching rows in their original order.
pub fn evaluate_grid<'g>(ast: &FilterNode, grid: &'g Grid) -> Vec<&'g Dict> {
    let index = grid.ref_index();
    grid.rows()
        .iter()
        .filter(|row| evaluate(ast, row, &index))
        .collect()
}

/// Evaluate `ast` against a single row, given a ref index built over the
/// same entity set the row belongs to.
pub fn evaluate(ast: &FilterNode, row: &Dict, index: &RefIndex<'_>) -> bool {
    match ast {
        FilterNode::Or(lhs, rhs) => evaluate(lhs, row, index) || evaluate(rhs, row, index),
        FilterNode::And(lhs, rhs) => evaluate(lhs, row, index) && evaluate(rhs, row, index),
        FilterNode::Not(inner) => !evaluate(inner, row, index),
        FilterNode::Has(path) => resolve_path(path, row, index)
            .map(Value::is_present)
            .unwrap_or(false),
        FilterNode::Cmp(path, op, rhs) => match resolve_path(path, row, index) {
            Some(lhs) => compare(lhs, *op, rhs),
            None => false,
        },
    }
}

/// Walk a dotted path: every hop but the last must dereference a `Ref` and
/// resolve against `index`; the final hop's value is returned as-is. Any
/// missing tag, non-present value, or unresolved ref breaks the chain and
/// yields `None` (evaluated as `false` by the caller).
fn resolve_path<'g>(path: &Path, row: &'g Dict, index: &RefIndex<'g>) -> Option<&'g Value> {
    let hops = path.hops();
    let mut current = row;
    for (i, hop) in hops.iter().enumerate() {
        let value = current.get(hop)?;
        if !value.is_present() {
            return None;
        }
        if i + 1 == hops.len() {
            return Some(value);
        }
        let r = value.as_ref_value()?;
        current = index.resolve(r)?;
    }
    None
}

/// Type-coerced comparison (spec §4.E): Number vs Number compares
/// numerically but a unit mismatch is `false`; strings order
/// lexicographically; DateTimes order by instant; Bools are equality-only.
/// Comparing values of different kinds degrades to `false` rather than
/// erroring, except `==`/`!=` which fall back to structural equality.
fn compare(lhs: &Value, op: CmpOp, rhs: &Value) -> bool {
    match op {
        CmpOp::Eq => lhs == rhs,
        CmpOp::Ne => lhs != rhs,
        CmpOp::Lt | CmpOp::Le | CmpOp::Gt | CmpOp::Ge => compare_ordered(lhs, op, rhs),
    }
}

fn compare_ordered(lhs: &Value, op: CmpOp, rhs: &Value) -> bool {
    let ordering = match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => {
            if a.unit() != b.unit() {
                return false;
            }
            match a.value().partial_cmp(&b.value()) {
                Some(o) => o,
                None => return false,
            }
        }
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        (Value::DateTime(a, _), Value::DateTime(b, _)) => a.cmp(b),
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        (Value::Time(a), Value::Time(b)) => a.cmp(b),
        _ => return false,
    };
    match op {
        CmpOp::Lt => ordering.is_lt(),
        CmpOp::Le => ordering.is_le(),
        CmpOp::Gt => ordering.is_gt(),
        CmpOp::Ge => ordering.is_ge(),
        CmpOp::Eq | CmpOp::Ne => unreachable!("handled in compare()"),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::{Number, Ref};

    #[test]
    fn site_and_area_filters_one_row() {
        let rows = vec![
            Dict::new()
                .with("id", Value::Ref(Ref::new("a".to_owned(), None).unwrap()))
                .with("site", Value::Marker)
                .with("area", Value::Number(Number::new(100.0, Some("ft2".to_owned())))),
            Dict::new()
                .with("id", Value::Ref(Ref::new("b".to_owned(), None).unwrap()))
                .with("equip", Value::Marker),
        ];
        let grid = Grid::from_rows(rows).unwrap();
        let ast = zinc_free_parse("site and area >= 50ft2");
        let matches = evaluate_grid(&ast, &grid);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            matches[0].get("id"),
            Some(&Value::Ref(Ref::new("a".to_owned(), None).unwrap()))
        );
    }

    #[test]
    fn ref_dereference_selects_by_resolved_tag() {
        let rows = vec![
            Dict::new()
                .with("id", Value::Ref(Ref::new("floor1".to_owned(), None).unwrap()))
                .with(
                    "siteRef",
                    Value::Ref(Ref::new("site1".to_owned(), None).unwrap()),
                ),
            Dict::new()
                .with("id", Value::Ref(Ref::new("site1".to_owned(), None).unwrap()))
                .with("geoCity", Value::str("Richmond")),
        ];
        let grid = Grid::from_rows(rows).unwrap();
        let ast = zinc_free_parse("siteRef->geoCity == \"Richmond\"");
        let matches = evaluate_grid(&ast, &grid);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            matches[0].get("id"),
            Some(&Value::Ref(Ref::new("floor1".to_owned(), None).unwrap()))
        );
    }

    #[test]
    fn broken_chain_is_false_not_error() {
        let rows = vec![Dict::new()
            .with("id", Value::Ref(Ref::new("a".to_owned(), None).unwrap()))
            .with(
                "siteRef",
                Value::Ref(Ref::new("missing".to_owned(), None).unwrap()),
            )];
        let grid = Grid::from_rows(rows).unwrap();
        let ast = zinc_free_parse("siteRef->geoCity == \"Richmond\"");
        assert!(evaluate_grid(&ast, &grid).is_empty());
    }

    fn zinc_free_parse(filter: &str) -> FilterNode {
        super::super::parser::parse_filter(filter).unwrap()
    }
}
