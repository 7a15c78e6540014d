//! Grid algebra (spec §4.I): `merge`, `diff`, `union`, keyed by each row's
//! `id` tag. These operate row-wise over a shared key rather than through
//! any positional assumption, since two grids being merged rarely share
//! row order.

use crate::grid::{Grid, SchemaError};
use crate::value::{Dict, Value};

fn row_key(row: &Dict) -> Option<String> {
    match row.get("id") {
        Some(Value::Ref(r)) => Some(r.name().to_owned()),
        _ => None,
    }
}

/// Overlay `patch` onto `base`, row by row, keyed by `id`. A patch row with
/// no matching base row is appended as-is. Within a matched row, a
/// `Remove` cell deletes the tag from the merged row; any other cell
/// overwrites it; a tag `patch` omits is left untouched.
pub fn merge(base: &Grid, patch: &Grid) -> Result<Grid, SchemaError> {
    let mut merged: Vec<Dict> = base.rows().to_vec();
    let mut index_by_key: std::collections::HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .filter_map(|(i, row)| row_key(row).map(|k| (k, i)))
        .collect();

    for patch_row in patch.rows() {
        match row_key(patch_row) {
            Some(key) => match index_by_key.get(&key) {
                Some(&i) => apply_overlay(&mut merged[i], patch_row),
                None => {
                    index_by_key.insert(key, merged.len());
                    merged.push(patch_row.clone());
                }
            },
            None => merged.push(patch_row.clone()),
        }
    }

    Grid::from_rows(merged)
}

fn apply_overlay(row: &mut Dict, patch_row: &Dict) {
    for (tag, value) in patch_row.iter() {
        match value {
            Value::Remove => {
                row.remove(tag);
            }
            other => row.insert(tag, other.clone()),
        }
    }
}

/// Produce a patch grid such that `merge(a, diff(a, b)) == b` (spec §4.I
/// inverse law). Rows present in `a` but absent from `b` are not covered
/// by `merge`'s append-only semantics, so a full round trip additionally
/// requires the caller to `diff` and then also carry forward `b`'s own
/// extra rows — `diff` emits exactly the patch, not a deletion list.
pub fn diff(a: &Grid, b: &Grid) -> Result<Grid, SchemaError> {
    let a_by_key: std::collections::HashMap<String, &Dict> = a
        .rows()
        .iter()
        .filter_map(|row| row_key(row).map(|k| (k, row)))
        .collect();

    let mut patch_rows = Vec::new();

    for b_row in b.rows() {
        match row_key(b_row) {
            Some(key) => match a_by_key.get(&key) {
                Some(a_row) => {
                    if let Some(cell_diff) = diff_row(a_row, b_row) {
                        patch_rows.push(cell_diff);
                    }
                }
                None => patch_rows.push(b_row.clone()),
            },
            None => patch_rows.push(b_row.clone()),
        }
    }

    Grid::from_rows(patch_rows)
}

/// Cell-wise diff of two rows sharing an `id`. Returns `None` if they are
/// already identical (so `diff(a, a)` yields no rows, per spec).
fn diff_row(a_row: &Dict, b_row: &Dict) -> Option<Dict> {
    if a_row == b_row {
        return None;
    }

    let mut patch = Dict::new();
    patch.insert("id", a_row.get("id").cloned().unwrap_or(Value::Null));

    for key in a_row.keys() {
        if b_row.get(key).is_none() {
            patch.insert(key, Value::Remove);
        }
    }

    for (key, b_value) in b_row.iter() {
        if key == "id" {
            continue;
        }
        if a_row.get(key) != Some(b_value) {
            patch.insert(key, b_value.clone());
        }
    }

    Some(patch)
}

/// Multiset union of `a` and `b` by `id`, preserving first occurrence
/// (spec §4.I) — a row in `b` sharing an `id` already seen in `a` is
/// dropped, not overlaid.
pub fn union(a: &Grid, b: &Grid) -> Result<Grid, SchemaError> {
    let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut rows = Vec::with_capacity(a.size() + b.size());

    for row in a.rows().iter().chain(b.rows()) {
        match row_key(row) {
            Some(key) => {
                if seen.insert(key) {
                    rows.push(row.clone());
                }
            }
            None => rows.push(row.clone()),
        }
    }

    Grid::from_rows(rows)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::Ref;

    fn row(id: &str, tags: &[(&str, Value)]) -> Dict {
        let mut d = Dict::new();
        d.insert("id", Value::Ref(Ref::new(id.to_owned(), None).unwrap()));
        for (k, v) in tags {
            d.insert(*k, v.clone());
        }
        d
    }

    #[test]
    fn merge_overlays_and_removes() {
        let base = Grid::from_rows(vec![row(
            "a",
            &[("site", Value::Marker), ("area", Value::number(10.0, None))],
        )])
        .unwrap();
        let patch = Grid::from_rows(vec![row(
            "a",
            &[("area", Value::number(20.0, None)), ("site", Value::Remove)],
        )])
        .unwrap();

        let merged = merge(&base, &patch).unwrap();
        let out = &merged.rows()[0];
        assert_eq!(out.get("area"), Some(&Value::number(20.0, None)));
        assert_eq!(out.get("site"), None);
    }

    #[test]
    fn diff_of_identical_grids_is_empty() {
        let g = Grid::from_rows(vec![row("a", &[("site", Value::Marker)])]).unwrap();
        let d = diff(&g, &g).unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn merge_diff_round_trips() {
        let a = Grid::from_rows(vec![row(
            "a",
            &[("site", Value::Marker), ("area", Value::number(10.0, None))],
        )])
        .unwrap();
        let b = Grid::from_rows(vec![row("a", &[("area", Value::number(99.0, None))])]).unwrap();

        let patch = diff(&a, &b).unwrap();
        let merged = merge(&a, &patch).unwrap();
        assert_eq!(merged.rows()[0].get("area"), b.rows()[0].get("area"));
        assert_eq!(merged.rows()[0].get("site"), None);
    }

    #[test]
    fn union_keeps_first_occurrence() {
        let a = Grid::from_rows(vec![row("a", &[("n", Value::number(1.0, None))])]).unwrap();
        let b = Grid::from_rows(vec![row("a", &[("n", Value::number(2.0, None))])]).unwrap();
        let u = union(&a, &b).unwrap();
        assert_eq!(u.size(), 1);
        assert_eq!(u.rows()[0].get("n"), Some(&Value::number(1.0, None)));
    }
}
