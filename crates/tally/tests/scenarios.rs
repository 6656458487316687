//! End-to-end reductions over small document collections.

use serde_json::json;
use tally::prelude::*;

fn docs(value: serde_json::Value) -> Vec<Document> {
    serde_json::from_value(value).expect("fixture documents should parse")
}

fn slot(acc: &Accumulator, key: &str) -> f64 {
    acc.get(key)
        .and_then(Value::as_f64)
        .unwrap_or_else(|| panic!("slot {key} should be numeric in {acc:?}"))
}

#[test]
fn count_groups_by_value_and_skips_null() {
    let rows = docs(json!([
        { "color": "red" },
        { "color": "red" },
        { "color": "blue" },
        { "color": null }
    ]));

    let out = count("color").evaluate(&rows).expect("count should succeed");

    assert_eq!(
        out,
        Accumulator::new()
            .with("red", Value::Int(2))
            .with("blue", Value::Int(1))
    );
}

#[test]
fn sum_adds_every_document() {
    let rows = docs(json!([{ "amount": 1 }, { "amount": 2 }, { "amount": 3 }]));

    let out = sum("amount").evaluate(&rows).expect("sum should succeed");

    assert_eq!(out, Accumulator::new().with("sum", 6.0));
}

#[test]
fn min_and_max_track_extremes() {
    let rows = docs(json!([{ "x": 5 }, { "x": 2 }, { "x": 9 }]));

    let low = min("x").evaluate(&rows).expect("min should succeed");
    let high = max("x").evaluate(&rows).expect("max should succeed");

    assert_eq!(low, Accumulator::new().with("min", 2.0));
    assert_eq!(high, Accumulator::new().with("max", 9.0));
}

#[test]
fn min_and_max_of_nothing_keep_their_seeds() {
    let low = min("x").evaluate(&[]).expect("empty min should succeed");
    let high = max("x").evaluate(&[]).expect("empty max should succeed");

    assert_eq!(slot(&low, "min"), f64::INFINITY);
    assert_eq!(slot(&high, "max"), f64::NEG_INFINITY);
}

#[test]
fn average_follows_the_streaming_recurrence() {
    let rows = docs(json!([{ "x": 2 }, { "x": 4 }, { "x": 6 }]));
    let agg = average("x");
    let mut fold = agg.fold();

    let expected = [(1, 2.0), (2, 3.0), (3, 4.0)];
    for (doc, (count, avg)) in rows.iter().zip(expected) {
        fold.push(doc).expect("average step should succeed");

        assert_eq!(fold.state().get("count"), Some(&Value::Int(count)));
        assert!((slot(fold.state(), "average") - avg).abs() < f64::EPSILON);
    }

    let whole = agg.evaluate(&rows).expect("average should succeed");
    assert_eq!(whole, fold.finish());
}

#[test]
fn default_count_uses_the_empty_field_name() {
    let plain = docs(json!([{ "color": "red" }, { "color": "blue" }]));
    let keyed = docs(json!([{ "": "odd" }, { "": "odd" }, { "color": "red" }]));

    let agg = count("");
    assert_eq!(agg.fields(), [""]);

    assert_eq!(agg.evaluate(&plain).expect("count"), Accumulator::new());
    assert_eq!(
        agg.evaluate(&keyed).expect("count"),
        Accumulator::new().with("odd", Value::Int(2))
    );
}

#[test]
fn query_narrows_the_folded_documents() {
    let rows = docs(json!([
        { "region": "eu", "amount": 10 },
        { "region": "us", "amount": 50 },
        { "region": "eu", "amount": 30 },
        { "region": "eu", "amount": 20 }
    ]));

    let query = Query::new()
        .filter(tally::query::eq("region", "eu"))
        .sort_desc("amount")
        .limit(2);
    let out = sum("amount")
        .with_query(query)
        .evaluate(&rows)
        .expect("sum should succeed");

    assert_eq!(out, Accumulator::new().with("sum", 50.0));
}

#[test]
fn json_configured_aggregation_matches_factory() {
    let configured = Aggregation::from_json(&json!({
        "initial": { "sum": 0.0 },
        "fields": ["amount"],
        "reducer": "sum"
    }))
    .expect("config should parse");
    let rows = docs(json!([{ "amount": 4 }, { "amount": 5 }]));

    assert_eq!(
        configured.evaluate(&rows).expect("configured sum"),
        sum("amount").evaluate(&rows).expect("factory sum")
    );
}
