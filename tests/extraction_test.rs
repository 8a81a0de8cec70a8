//! Extraction of the saved dashboard fixtures under `tests/data/dashboards`.

use dashcompare::extraction::{extract_dashboard, Triple, WidgetInfo};
use dashcompare::source::load_from_file;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::path::PathBuf;

fn fixture(name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/dashboards")
        .join(name);
    load_from_file(&path).unwrap()
}

fn widget(title: &str, widget_type: &str) -> WidgetInfo {
    WidgetInfo {
        title: title.to_string(),
        widget_type: widget_type.to_string(),
    }
}

#[test]
fn test_extract_full_dashboard() {
    let summary = extract_dashboard(&fixture("qa_revenue.json"));

    assert_eq!(summary.title, "Revenue Overview");
    assert_eq!(summary.filters, vec!["Region", "Order Date"]);
    assert_eq!(
        summary.widgets,
        vec![
            widget("Total Revenue", "indicator"),
            widget("Revenue by Region", "pivot2"),
            widget("Notes", "richtexteditor"),
        ]
    );
    assert_eq!(summary.rich_text, vec!["Figures are net of tax"]);
    assert_eq!(
        summary.rich_text_html,
        vec!["<p>Figures are <b>net</b> of tax</p>"]
    );
}

#[test]
fn test_indicators_deduplicated_keeping_first_spelling() {
    let summary = extract_dashboard(&fixture("qa_revenue.json"));
    let indicators: Vec<&Triple> = summary.indicators.iter().collect();
    assert_eq!(
        indicators,
        vec![
            &Triple::new("value", "Revenue", "Gross Sales"),
            &Triple::new("value", "Revenue", "Returns"),
        ]
    );
}

#[test]
fn test_pivot_values_use_expanded_formula() {
    let summary = extract_dashboard(&fixture("qa_revenue.json"));
    assert_eq!(
        summary.pivots,
        vec![
            Triple::new("rows", "Region", "Geo.Region"),
            Triple::new("values", "Net", "Sales - Refunds"),
        ]
    );
}

#[test]
fn test_export_wrapper_shape() {
    let summary = extract_dashboard(&fixture("prod_revenue.dash"));

    assert_eq!(summary.filters, vec!["Region", "Product"]);
    assert_eq!(summary.widgets.len(), 3);
    assert!(summary.rich_text.is_empty());
    assert_eq!(summary.indicators.len(), 1);
    assert_eq!(
        summary.pivots[1],
        Triple::new("values", "Net", "Facts.NetAmount")
    );
}

#[test]
fn test_widgets_wrapper_without_array() {
    let summary = extract_dashboard(&json!({"title": "Odd", "widgets": {"count": 3}}));
    assert!(summary.widgets.is_empty());
}

fn arbitrary_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z<>/ ]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 6, |inner| {
        let keys = prop_oneof![
            Just("title".to_string()),
            Just("widgets".to_string()),
            Just("filters".to_string()),
            Just("jaql".to_string()),
            Just("metadata".to_string()),
            Just("panels".to_string()),
            Just("items".to_string()),
            Just("type".to_string()),
            "[a-z]{1,6}",
        ];
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(keys, inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Property: extraction is total over arbitrary JSON
    #[test]
    fn prop_extraction_never_panics(doc in arbitrary_json()) {
        let summary = extract_dashboard(&doc);
        prop_assert_eq!(summary.rich_text.len(), summary.rich_text_html.len());
    }

    /// Property: indicators never contain two triples equal after trimming and lower-casing
    #[test]
    fn prop_indicator_keys_unique(
        entries in prop::collection::vec(("[ aAbB]{0,3}", "[ aAbB]{0,3}", "[ aAbB]{0,3}"), 0..12)
    ) {
        let items: Vec<Value> = entries
            .iter()
            .map(|(panel, title, source)| json!({
                "title": "KPI",
                "type": "indicator",
                "metadata": {"panels": [{"name": panel, "items": [
                    {"jaql": {"title": title, "context": {"[k]": {"title": source}}}}
                ]}]}
            }))
            .collect();
        let summary = extract_dashboard(&json!({"widgets": items}));

        let keys: Vec<Triple> = summary.indicators.iter().map(Triple::normalized).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(keys, sorted);
    }
}
