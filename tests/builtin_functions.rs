use computed_field_eval as cfe;
use computed_field_eval::{Document, InvertedIndex, NamedExpression, ScoredDocument, Value};

fn listing() -> (ScoredDocument, InvertedIndex) {
    let doc = Document::new("car-1")
        .with_field("price", 19500.0)
        .with_field("body", "Low mileage red car with sunroof")
        .with_field("color", "red")
        .with_field("color", "burgundy");
    let mut index = InvertedIndex::new();
    index.add_document(&doc);
    (ScoredDocument::new(doc), index)
}

fn eval(scored: &mut ScoredDocument, index: &InvertedIndex, text: &str) {
    cfe::evaluate_all(scored, index, &[NamedExpression::new("out", text)]).unwrap();
}

#[test]
fn min_returns_the_smallest_argument() {
    let (mut scored, index) = listing();
    eval(&mut scored, &index, "min(3, 1, 2)");
    assert_eq!(scored.expressions["out"], Value::Number(1.0));
}

#[test]
fn max_mixes_literals_and_fields() {
    let (mut scored, index) = listing();
    eval(&mut scored, &index, "max(price, 25000)");
    assert_eq!(scored.expressions["out"], Value::Number(25000.0));
}

#[test]
fn min_max_calls_nest() {
    let (mut scored, index) = listing();
    eval(&mut scored, &index, "min(max(1, 2), 5)");
    assert_eq!(scored.expressions["out"], Value::Number(2.0));
}

#[test]
fn count_counts_stored_values() {
    let (mut scored, index) = listing();
    eval(&mut scored, &index, "count(color)");
    assert_eq!(scored.expressions["out"], Value::Number(2.0));
}

#[test]
fn count_of_an_absent_field_is_zero() {
    let (mut scored, index) = listing();
    eval(&mut scored, &index, "count(horsepower)");
    assert_eq!(scored.expressions["out"], Value::Number(0.0));
}

#[test]
fn snippet_wraps_the_match_in_markers() {
    let (mut scored, index) = listing();
    eval(&mut scored, &index, r#"snippet("sunroof", body)"#);
    let Value::Text(out) = &scored.expressions["out"] else {
        panic!("expected text");
    };
    assert!(out.starts_with("..."));
    assert!(out.ends_with("..."));
    assert!(out.contains("<b>sunroof</b>"));
}

#[test]
fn snippet_ignores_extra_arguments() {
    let (mut scored, index) = listing();
    eval(&mut scored, &index, r#"snippet("sunroof", body, 42)"#);
    assert!(scored.expressions.contains_key("out"));
}

#[test]
fn distance_is_always_unsupported() {
    let (mut scored, index) = listing();
    eval(&mut scored, &index, "distance(home, office)");
    assert!(scored.expressions.is_empty());
}

#[test]
fn unknown_functions_are_skipped() {
    let (mut scored, index) = listing();
    eval(&mut scored, &index, "median(1, 2, 3)");
    assert!(scored.expressions.is_empty());
}
