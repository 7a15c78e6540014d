//! Cross-module scenarios exercising the codecs, filter evaluator, SQL
//! translator, and grid algebra together, rather than each in isolation.

use haystack_core::value::{Dict, Ref, Value};
use haystack_core::{codec, filter, sql, zinc, Grid};

#[test]
fn zinc_parse_emit_round_trips_byte_identically() {
    let input = "ver:\"3.0\"\nname,age\n\"Alice\",N\n\"Bob\",30\n";
    let grid = zinc::parse_zinc(input).unwrap();

    assert_eq!(grid.size(), 2);
    assert_eq!(
        grid.col_names().map(|n| n.as_str()).collect::<Vec<_>>(),
        vec!["name", "age"]
    );
    assert_eq!(grid.rows()[0].get("age"), Some(&Value::Null));
    assert_eq!(grid.rows()[1].get("age"), Some(&Value::number(30.0, None)));

    assert_eq!(zinc::emit_zinc(&grid), input);
}

#[test]
fn quantity_unit_preserved_across_zinc_and_json() {
    let n = zinc::parse_scalar("154kg").unwrap();
    assert_eq!(n, Value::number(154.0, Some("kg")));

    let json = codec::json::encode_value(&n);
    assert_eq!(json, serde_json::json!("n:154 kg"));

    let back = codec::json::decode_value(&json).unwrap();
    assert_eq!(back, n);
}

fn row(id: &str, tags: &[(&str, Value)]) -> Dict {
    let mut d = Dict::new();
    d.insert("id", Value::Ref(Ref::new(id.to_owned(), None).unwrap()));
    for (k, v) in tags {
        d.insert(*k, v.clone());
    }
    d
}

#[test]
fn filter_selects_only_the_matching_entity() {
    let grid = Grid::from_rows(vec![
        row(
            "a",
            &[("site", Value::Marker), ("area", Value::number(100.0, Some("ft2")))],
        ),
        row("b", &[("equip", Value::Marker)]),
    ])
    .unwrap();

    let ast = filter::parse_filter("site and area >= 50ft2").unwrap();
    let selected = filter::evaluate_grid(&ast, &grid);

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].get("id"), grid.rows()[0].get("id"));
}

#[test]
fn ref_dereference_selects_the_dependent_entity() {
    let grid = Grid::from_rows(vec![
        row(
            "floor1",
            &[(
                "siteRef",
                Value::Ref(Ref::new("site1".to_owned(), None).unwrap()),
            )],
        ),
        row("site1", &[("geoCity", Value::str("Richmond"))]),
    ])
    .unwrap();

    let ast = filter::parse_filter("siteRef->geoCity == \"Richmond\"").unwrap();
    let selected = filter::evaluate_grid(&ast, &grid);

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].get("id"), grid.rows()[0].get("id"));
}

#[test]
fn sql_translation_matches_the_documented_scenario() {
    let ast = filter::parse_filter("site and area >= 50ft2").unwrap();
    let translation = sql::translate(&ast, &sql::Sqlite, "entity");

    assert_eq!(
        translation.where_clause,
        "(json_extract(entity.entity,'$.site') IS NOT NULL AND json_extract(entity.entity,'$.site') <> 'false') AND (CAST(SUBSTR(json_extract(entity.entity,'$.area'),3) AS REAL) >= ? AND json_extract(entity.entity,'$.area') LIKE '%ft2')"
    );
    assert_eq!(translation.binds, vec![sql::SqlParam::Real(50.0)]);
}

#[test]
fn grid_diff_and_merge_round_trip() {
    let a = Grid::from_rows(vec![row("x", &[("v", Value::number(1.0, None))])]).unwrap();
    let b = Grid::from_rows(vec![row(
        "x",
        &[("v", Value::number(2.0, None)), ("w", Value::number(3.0, None))],
    )])
    .unwrap();

    let patch = haystack_core::algebra::diff(&a, &b).unwrap();
    assert_eq!(patch.rows()[0].get("v"), b.rows()[0].get("v"));
    assert_eq!(patch.rows()[0].get("w"), b.rows()[0].get("w"));

    let merged = haystack_core::algebra::merge(&a, &patch).unwrap();
    assert_eq!(merged.rows()[0], b.rows()[0]);
}
