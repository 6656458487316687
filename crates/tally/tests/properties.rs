//! Property checks for the aggregation configuration surface.

use proptest::prelude::*;
use serde_json::{Value as JsonValue, json};
use tally::{
    aggregation::{Aggregation, AggregationConfig, average, sum},
    error::AggregationError,
    value::{Document, Value},
};

fn arb_fields() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z_]{0,6}", 0..6)
}

fn arb_non_array_json() -> impl Strategy<Value = JsonValue> {
    prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(JsonValue::String),
        "[a-z]{1,4}".prop_map(|k| json!({ k: 1 })),
    ]
}

fn arb_non_query_json() -> impl Strategy<Value = JsonValue> {
    prop_oneof![
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(JsonValue::String),
        prop::collection::vec(any::<i32>(), 0..3).prop_map(|v| json!(v)),
        "[a-e]{1,4}".prop_map(|k| json!({ k: true })),
        Just(json!({})),
    ]
}

proptest! {
    #[test]
    fn fields_round_trip(fields in arb_fields()) {
        let agg = Aggregation::new(AggregationConfig {
            fields: fields.clone(),
            ..AggregationConfig::default()
        });
        prop_assert_eq!(agg.fields(), fields.as_slice());

        let from_json = Aggregation::from_json(&json!({ "fields": fields.clone() }))
            .expect("string arrays are valid fields");
        prop_assert_eq!(from_json.fields(), fields.as_slice());
    }

    #[test]
    fn non_array_fields_are_rejected(fields in arb_non_array_json()) {
        let result = Aggregation::from_json(&json!({ "fields": fields }));
        let rejected = matches!(result, Err(AggregationError::InvalidArgument { .. }));
        prop_assert!(rejected);
    }

    #[test]
    fn non_query_values_are_rejected(query in arb_non_query_json()) {
        let result = Aggregation::from_json(&json!({ "query": query }));
        let rejected = matches!(result, Err(AggregationError::InvalidArgument { .. }));
        prop_assert!(rejected);
    }

    #[test]
    fn by_preserves_order_and_duplicates(fields in arb_fields()) {
        let mut agg = Aggregation::default();
        for field in &fields {
            agg.by(field.as_str());
        }
        prop_assert_eq!(agg.fields(), fields.as_slice());
    }

    #[test]
    fn average_matches_mean_for_small_integers(xs in prop::collection::vec(-1000i64..1000, 1..40)) {
        let rows: Vec<Document> = xs.iter().map(|x| Document::new().with("x", *x)).collect();

        let out = average("x").evaluate(&rows).expect("average should succeed");
        let total = sum("x").evaluate(&rows).expect("sum should succeed");

        let n = i64::try_from(rows.len()).expect("small vec");
        let mean = total.get("sum").and_then(Value::as_f64).expect("sum slot") / n as f64;
        let avg = out.get("average").and_then(Value::as_f64).expect("average slot");

        prop_assert_eq!(out.get("count"), Some(&Value::Int(n)));
        prop_assert!((avg - mean).abs() < 1e-9);
    }
}
