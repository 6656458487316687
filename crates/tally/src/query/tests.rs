use super::*;
use crate::value::Document;

fn doc(name: &str, age: i64) -> Document {
    Document::new().with("name", name).with("age", age)
}

fn names(docs: &[&Document]) -> Vec<String> {
    docs.iter()
        .filter_map(|d| d.field("name").and_then(Value::as_text).map(str::to_string))
        .collect()
}

#[test]
fn fluent_chain_builds_predicate_tree() {
    let query = Query::new()
        .filter(eq("name", "ice"))
        .and(gt("age", 10))
        .or(is_null("deleted_at"));

    let expected = Predicate::Or(vec![
        Predicate::And(vec![
            Predicate::Compare(ComparePredicate::new("name", CompareOp::Eq, "ice")),
            Predicate::Compare(ComparePredicate::new("age", CompareOp::Gt, 10)),
        ]),
        Predicate::IsNull {
            field: "deleted_at".to_string(),
        },
    ]);

    assert_eq!(query.predicate(), Some(&expected));
}

#[test]
fn and_chains_are_flattened() {
    let query = Query::new()
        .filter(eq("a", 1))
        .and(eq("b", 2))
        .and(eq("c", 3));

    let Some(Predicate::And(children)) = query.predicate() else {
        panic!("expected and predicate");
    };
    assert_eq!(children.len(), 3);
}

#[test]
fn missing_fields_never_satisfy_comparisons() {
    let row = Document::new().with("name", "x");

    assert!(!eq("age", 1).matches(&row));
    assert!(!ne("age", 1).matches(&row));
    assert!(!exists("age").matches(&row));
    assert!((!exists("age")).matches(&row));
}

#[test]
fn in_list_uses_numeric_widening() {
    let row = Document::new().with("n", 2.0);

    assert!(in_list("n", [1, 2, 3]).matches(&row));
    assert!(!in_list("n", [4, 5]).matches(&row));
}

#[test]
fn apply_filters_sorts_and_windows() {
    let docs = vec![
        doc("a", 30),
        doc("b", 10),
        doc("c", 20),
        doc("d", 40),
        doc("e", 5),
    ];

    let query = Query::new().filter(gte("age", 10)).sort_desc("age").skip(1).limit(2);
    let selected = query.apply(&docs);

    assert_eq!(names(&selected), vec!["a", "c"]);
}

#[test]
fn apply_sort_places_absent_and_null_first() {
    let docs = vec![
        doc("z", 1),
        Document::new().with("name", "null").with("age", Value::Null),
        Document::new().with("name", "absent"),
    ];

    let selected = Query::new().sort_asc("age").apply(&docs);

    assert_eq!(names(&selected), vec!["absent", "null", "z"]);
}

#[test]
fn empty_query_selects_everything_in_order() {
    let docs = vec![doc("a", 1), doc("b", 2)];

    assert_eq!(names(&Query::new().apply(&docs)), vec!["a", "b"]);
}

#[test]
fn query_json_rejects_unknown_keys() {
    let ok: Result<Query, _> = serde_json::from_str(r#"{"limit":2,"sort":[{"field":"age"}]}"#);
    let bad: Result<Query, _> = serde_json::from_str(r#"{"color":"red"}"#);

    let ok = ok.expect("query json should parse");
    assert_eq!(ok.limit_count(), Some(2));
    assert_eq!(ok.sort_fields()[0].direction, SortDirection::Asc);
    assert!(bad.is_err());
}
