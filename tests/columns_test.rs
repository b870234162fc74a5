use sheetlens::columns::infer_columns;
use sheetlens::row::{Row, Value};

fn rows_with(column: &str, numeric: usize, text: usize) -> Vec<Row> {
    let mut rows = Vec::new();
    for i in 0..numeric {
        rows.push(Row::from_iter([(column, Value::from(i.to_string()))]));
    }
    for _ in 0..text {
        rows.push(Row::from_iter([(column, "n/a")]));
    }
    rows
}

#[test]
fn columns_are_union_of_keys_in_first_seen_order() {
    let rows = vec![
        Row::from_iter([("a", "1"), ("b", "x")]),
        Row::from_iter([("c", "2")]),
        Row::from_iter([("b", "y"), ("a", "3")]),
    ];
    let set = infer_columns(&rows);
    assert_eq!(set.columns, vec!["a", "b", "c"]);
    assert_eq!(set.numeric, vec!["a", "c"]);
}

#[test]
fn sixty_percent_is_numeric_fifty_nine_is_not() {
    let set = infer_columns(&rows_with("v", 60, 40));
    assert!(set.is_numeric("v"));

    let set = infer_columns(&rows_with("v", 59, 41));
    assert!(!set.is_numeric("v"));
    assert!(set.contains("v"));
}

#[test]
fn missing_and_empty_values_do_not_count_against_a_column() {
    let mut rows = rows_with("v", 3, 2);
    rows.push(Row::from_iter([("v", Value::Null)]));
    rows.push(Row::from_iter([("v", "")]));
    rows.push(Row::from_iter([("other", "x")]));
    let set = infer_columns(&rows);
    assert!(set.is_numeric("v"));
}

#[test]
fn empty_dataset_has_no_columns() {
    let set = infer_columns(&[]);
    assert!(set.columns.is_empty());
    assert!(set.numeric.is_empty());
}

#[test]
fn column_with_only_missing_values_is_not_numeric() {
    let rows = vec![
        Row::from_iter([("k", Value::from("a")), ("v", Value::Null)]),
        Row::from_iter([("k", Value::from("b")), ("v", Value::from(""))]),
    ];
    let set = infer_columns(&rows);
    assert_eq!(set.columns, vec!["k", "v"]);
    assert!(set.numeric.is_empty());
}

#[test]
fn native_numbers_and_numeric_text_both_count() {
    let rows = vec![
        Row::from_iter([("v", Value::Number(1.5))]),
        Row::from_iter([("v", Value::from(" 2 "))]),
        Row::from_iter([("v", Value::from("-3e2"))]),
    ];
    assert!(infer_columns(&rows).is_numeric("v"));
}

#[test]
fn boolean_columns_are_numeric() {
    let rows = vec![
        Row::from_iter([("flag", Value::Bool(true))]),
        Row::from_iter([("flag", Value::Bool(false))]),
        Row::from_iter([("flag", Value::Bool(true))]),
    ];
    assert_eq!(infer_columns(&rows).numeric, vec!["flag"]);
}
