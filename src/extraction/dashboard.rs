//! Dashboard metadata extraction.
//!
//! [`extract_dashboard`] walks one raw dashboard document (with its widget
//! list already attached under `widgets`) and produces a [`DashboardSummary`]:
//! the comparable units the reconciler lines up across dashboards.
//!
//! Extraction is total. Missing, `null` or wrongly typed fields are read as
//! empty values and the walk continues, so a dashboard saved by an older or
//! newer server still yields a partial summary.
//!
//! # Usage
//!
//! ```rust
//! use dashcompare::extraction::extract_dashboard;
//! use serde_json::json;
//!
//! let raw = json!({
//!     "title": "Revenue Overview",
//!     "filters": [{"jaql": {"title": "Region"}}],
//!     "widgets": [{"title": "Notes", "type": "richtexteditor",
//!                  "style": {"content": {"html": "<b>Q3</b> close"}}}]
//! });
//! let summary = extract_dashboard(&raw);
//! assert_eq!(summary.filters, vec!["Region"]);
//! assert_eq!(summary.rich_text, vec!["Q3 close"]);
//! ```

use crate::extraction::formula::expand_formula;
use crate::extraction::html::strip_html_tags;
use crate::extraction::json_access::{array_at, object_at, opt_str_at, str_at};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Title used when a dashboard document carries none.
pub const UNTITLED: &str = "Untitled";

const INDICATOR_TYPE: &str = "indicator";
const PIVOT_TYPE: &str = "pivot2";
const VALUES_PANEL: &str = "values";

/// A widget's identity as shown in the widget title and type tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetInfo {
    pub title: String,
    #[serde(rename = "type")]
    pub widget_type: String,
}

/// A panel item rendered as `(panel, title, detail)`.
///
/// `detail` is the context source title for indicators, and the expanded
/// formula or `table.column` binding for pivot columns. Ordering is the
/// lexicographic order of the tuple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    pub panel: String,
    pub title: String,
    pub detail: String,
}

impl Triple {
    pub fn new(panel: impl Into<String>, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            panel: panel.into(),
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// Trimmed, lower-cased copy used as the indicator dedup key.
    pub fn normalized(&self) -> Triple {
        let norm = |s: &str| s.trim().to_lowercase();
        Triple {
            panel: norm(&self.panel),
            title: norm(&self.title),
            detail: norm(&self.detail),
        }
    }

    pub fn fields(&self) -> [&str; 3] {
        [&self.panel, &self.title, &self.detail]
    }

    fn named(&self, detail_name: &'static str) -> NamedTriple<'_> {
        NamedTriple {
            triple: self,
            detail_name,
        }
    }
}

/// Serialized form of a triple: `detail` goes out as `source` for
/// indicators and `value` for pivot columns.
struct NamedTriple<'a> {
    triple: &'a Triple,
    detail_name: &'static str,
}

impl Serialize for NamedTriple<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Triple", 3)?;
        state.serialize_field("panel", &self.triple.panel)?;
        state.serialize_field("title", &self.triple.title)?;
        state.serialize_field(self.detail_name, &self.triple.detail)?;
        state.end()
    }
}

fn serialize_pivots<S: Serializer>(pivots: &[Triple], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(pivots.iter().map(|t| t.named("value")))
}

/// Indicator triples deduplicated case- and whitespace-insensitively.
///
/// The first-seen spelling of a triple is the one kept. Iteration follows
/// the normalized key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorSet {
    entries: BTreeMap<Triple, Triple>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless an equivalent triple is already present. Returns whether it was added.
    pub fn insert(&mut self, triple: Triple) -> bool {
        match self.entries.entry(triple.normalized()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(triple);
                true
            }
        }
    }

    /// Exact (display spelling) membership.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.entries
            .get(&triple.normalized())
            .is_some_and(|kept| kept == triple)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for IndicatorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|t| t.named("source")))
    }
}

impl FromIterator<Triple> for IndicatorSet {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut set = IndicatorSet::new();
        for triple in iter {
            set.insert(triple);
        }
        set
    }
}

/// Comparable metadata of one dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub title: String,
    /// Filter titles in source order, duplicates kept.
    pub filters: Vec<String>,
    pub widgets: Vec<WidgetInfo>,
    /// Tag-stripped text of each rich-text block.
    pub rich_text: Vec<String>,
    /// Raw HTML of the same blocks, parallel to `rich_text`.
    pub rich_text_html: Vec<String>,
    pub indicators: IndicatorSet,
    /// One entry per pivot panel item; duplicates are distinct columns.
    #[serde(serialize_with = "serialize_pivots")]
    pub pivots: Vec<Triple>,
}

impl DashboardSummary {
    pub fn widget_titles(&self) -> impl Iterator<Item = &str> {
        self.widgets.iter().map(|w| w.title.as_str())
    }

    pub fn widget_types(&self) -> impl Iterator<Item = &str> {
        self.widgets.iter().map(|w| w.widget_type.as_str())
    }
}

/// Widgets come either as a bare array or wrapped as `{"widgets": [...]}`
/// (the export document shape).
pub fn resolve_widgets(raw: &Value) -> &[Value] {
    match raw.get("widgets") {
        Some(Value::Array(widgets)) => widgets,
        Some(wrapper @ Value::Object(_)) => array_at(wrapper, &["widgets"]),
        _ => &[],
    }
}

/// Extract the comparable metadata of one dashboard document.
pub fn extract_dashboard(raw: &Value) -> DashboardSummary {
    let mut summary = DashboardSummary {
        title: opt_str_at(raw, &["title"]).unwrap_or(UNTITLED).to_string(),
        filters: array_at(raw, &["filters"])
            .iter()
            .map(|filter| str_at(filter, &["jaql", "title"]).to_string())
            .collect(),
        widgets: Vec::new(),
        rich_text: Vec::new(),
        rich_text_html: Vec::new(),
        indicators: IndicatorSet::new(),
        pivots: Vec::new(),
    };

    for widget in resolve_widgets(raw) {
        collect_widget(widget, &mut summary);
    }

    log::debug!(
        "Extracted '{}': {} filters, {} widgets, {} rich text, {} indicators, {} pivot columns",
        summary.title,
        summary.filters.len(),
        summary.widgets.len(),
        summary.rich_text.len(),
        summary.indicators.len(),
        summary.pivots.len()
    );

    summary
}

fn collect_widget(widget: &Value, summary: &mut DashboardSummary) {
    let widget_type = str_at(widget, &["type"]);
    summary.widgets.push(WidgetInfo {
        title: str_at(widget, &["title"]).to_string(),
        widget_type: widget_type.to_string(),
    });

    let html = str_at(widget, &["style", "content", "html"]);
    if !html.is_empty() {
        summary.rich_text.push(strip_html_tags(Some(html)));
        summary.rich_text_html.push(html.to_string());
    }

    if widget_type.eq_ignore_ascii_case(INDICATOR_TYPE) {
        collect_indicators(widget, &mut summary.indicators);
    } else if widget_type.eq_ignore_ascii_case(PIVOT_TYPE) {
        collect_pivot_columns(widget, &mut summary.pivots);
    }
}

fn collect_indicators(widget: &Value, indicators: &mut IndicatorSet) {
    for panel in array_at(widget, &["metadata", "panels"]) {
        let panel_name = str_at(panel, &["name"]);
        for item in array_at(panel, &["items"]) {
            let title = str_at(item, &["jaql", "title"]);
            for source in object_at(item, &["jaql", "context"]).values() {
                indicators.insert(Triple::new(panel_name, title, str_at(source, &["title"])));
            }
        }
    }
}

fn collect_pivot_columns(widget: &Value, pivots: &mut Vec<Triple>) {
    for panel in array_at(widget, &["metadata", "panels"]) {
        let panel_name = str_at(panel, &["name"]);
        let is_values = panel_name.eq_ignore_ascii_case(VALUES_PANEL);
        for item in array_at(panel, &["items"]) {
            let title = str_at(item, &["jaql", "title"]);
            let formula = str_at(item, &["jaql", "formula"]);
            let detail = if is_values && !formula.is_empty() {
                expand_formula(formula, object_at(item, &["jaql", "context"]))
            } else {
                format!(
                    "{}.{}",
                    str_at(item, &["jaql", "table"]),
                    str_at(item, &["jaql", "column"])
                )
            };
            pivots.push(Triple::new(panel_name, title, detail));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn indicator_widget(panel: &str, title: &str, source: &str) -> Value {
        json!({
            "title": "KPI",
            "type": "indicator",
            "metadata": {"panels": [{
                "name": panel,
                "items": [{"jaql": {"title": title, "context": {"[k]": {"title": source}}}}]
            }]}
        })
    }

    #[test]
    fn test_empty_document() {
        let summary = extract_dashboard(&json!({}));
        assert_eq!(summary.title, UNTITLED);
        assert!(summary.filters.is_empty());
        assert!(summary.widgets.is_empty());
        assert!(summary.indicators.is_empty());
        assert!(summary.pivots.is_empty());
    }

    #[test]
    fn test_non_object_document() {
        let summary = extract_dashboard(&json!([1, 2, 3]));
        assert_eq!(summary.title, UNTITLED);
        assert!(summary.widgets.is_empty());
    }

    #[test]
    fn test_filters_keep_order_and_duplicates() {
        let raw = json!({"filters": [
            {"jaql": {"title": "Region"}},
            {"jaql": {}},
            {"jaql": {"title": "Date"}},
            {"jaql": {"title": "Region"}}
        ]});
        let summary = extract_dashboard(&raw);
        assert_eq!(summary.filters, vec!["Region", "", "Date", "Region"]);
    }

    #[test]
    fn test_widgets_wrapper_matches_bare_array() {
        let widgets = json!([
            {"title": "A", "type": "chart/bar"},
            indicator_widget("Value", "Total Sales", "Revenue")
        ]);
        let bare = extract_dashboard(&json!({"title": "D", "widgets": widgets.clone()}));
        let wrapped = extract_dashboard(&json!({"title": "D", "widgets": {"widgets": widgets}}));
        assert_eq!(bare, wrapped);
        assert_eq!(bare.widgets.len(), 2);
    }

    #[test]
    fn test_null_widgets() {
        let summary = extract_dashboard(&json!({"widgets": null}));
        assert!(summary.widgets.is_empty());
    }

    #[test]
    fn test_rich_text_only_for_present_html() {
        let raw = json!({"widgets": [
            {"title": "Text", "type": "richtexteditor", "style": {"content": {"html": "<p>Hello</p>"}}},
            {"title": "Chart", "type": "chart/line", "style": {}},
            {"title": "Blank", "type": "richtexteditor", "style": {"content": {"html": ""}}}
        ]});
        let summary = extract_dashboard(&raw);
        assert_eq!(summary.rich_text, vec!["Hello"]);
        assert_eq!(summary.rich_text_html, vec!["<p>Hello</p>"]);
    }

    #[test]
    fn test_indicator_dedup_keeps_first_spelling() {
        let raw = json!({"widgets": [
            indicator_widget("Values", "Total", "Fact.Sales"),
            indicator_widget(" values ", "TOTAL", "fact.sales ")
        ]});
        let summary = extract_dashboard(&raw);
        let indicators: Vec<&Triple> = summary.indicators.iter().collect();
        assert_eq!(indicators, vec![&Triple::new("Values", "Total", "Fact.Sales")]);
    }

    #[test]
    fn test_indicator_type_is_case_insensitive() {
        let mut widget = indicator_widget("Value", "Total Sales", "Revenue");
        widget["type"] = json!("INDICATOR");
        let summary = extract_dashboard(&json!({"widgets": [widget]}));
        assert_eq!(summary.indicators.len(), 1);
    }

    #[test]
    fn test_indicator_item_per_context_entry() {
        let widget = json!({
            "type": "indicator",
            "metadata": {"panels": [{
                "name": "value",
                "items": [{"jaql": {"title": "ADR", "context": {
                    "[a]": {"title": "Room Revenue"},
                    "[b]": {"title": "Rooms Sold"}
                }}}, {"jaql": {"title": "No context"}}]
            }]}
        });
        let summary = extract_dashboard(&json!({"widgets": [widget]}));
        let titles: Vec<&str> = summary.indicators.iter().map(|t| t.detail.as_str()).collect();
        assert_eq!(titles, vec!["Room Revenue", "Rooms Sold"]);
    }

    #[test]
    fn test_indicators_sorted_by_normalized_key() {
        let raw = json!({"widgets": [
            indicator_widget("value", "b", "x"),
            indicator_widget("Value", "A", "x")
        ]});
        let summary = extract_dashboard(&raw);
        let titles: Vec<&str> = summary.indicators.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "b"]);
    }

    #[test]
    fn test_pivot_formula_and_column_bindings() {
        let widget = json!({
            "title": "Pivot",
            "type": "pivot2",
            "metadata": {"panels": [
                {"name": "rows", "items": [{"jaql": {"title": "Hotel", "table": "Dim", "column": "Name"}}]},
                {"name": "Values", "items": [
                    {"jaql": {"title": "ADR", "formula": "[r]/[n]", "context": {
                        "[r]": {"title": "Revenue"}, "[n]": {"title": "Nights"}
                    }}},
                    {"jaql": {"title": "Rooms", "table": "Fact", "column": "Rooms"}}
                ]},
                {"name": "columns", "items": [{"jaql": {"title": "Calc", "formula": "[x]"}}]}
            ]}
        });
        let summary = extract_dashboard(&json!({"widgets": [widget]}));
        assert_eq!(
            summary.pivots,
            vec![
                Triple::new("rows", "Hotel", "Dim.Name"),
                Triple::new("Values", "ADR", "Revenue/Nights"),
                Triple::new("Values", "Rooms", "Fact.Rooms"),
                Triple::new("columns", "Calc", "."),
            ]
        );
    }

    #[test]
    fn test_pivot_duplicates_survive() {
        let item = json!({"jaql": {"title": "Rooms", "table": "Fact", "column": "Rooms"}});
        let widget = json!({
            "type": "Pivot2",
            "metadata": {"panels": [{"name": "values", "items": [item.clone(), item]}]}
        });
        let summary = extract_dashboard(&json!({"widgets": [widget]}));
        assert_eq!(summary.pivots.len(), 2);
        assert_eq!(summary.pivots[0], summary.pivots[1]);
    }

    #[test]
    fn test_wrong_types_degrade_to_empty() {
        let raw = json!({
            "title": "Odd",
            "filters": "not a list",
            "widgets": [
                {"title": 7, "type": null, "style": "flat"},
                {"type": "indicator", "metadata": {"panels": [{"name": 1, "items": [{"jaql": "x"}]}]}},
                {"type": "pivot2", "metadata": {"panels": "nope"}},
                "not even an object"
            ]
        });
        let summary = extract_dashboard(&raw);
        assert_eq!(summary.title, "Odd");
        assert!(summary.filters.is_empty());
        assert_eq!(summary.widgets.len(), 4);
        assert_eq!(summary.widgets[0], WidgetInfo { title: String::new(), widget_type: String::new() });
        assert!(summary.indicators.is_empty());
        assert!(summary.pivots.is_empty());
    }

    #[test]
    fn test_indicator_set_contains_exact_spelling_only() {
        let set: IndicatorSet = vec![Triple::new("Value", "Total", "Revenue")].into_iter().collect();
        assert!(set.contains(&Triple::new("Value", "Total", "Revenue")));
        assert!(!set.contains(&Triple::new("value", "total", "revenue")));
    }

    #[test]
    fn test_summary_serializes_indicators_as_sequence() {
        let summary = extract_dashboard(&json!({"widgets": [indicator_widget("V", "T", "S")]}));
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value["indicators"],
            json!([{"panel": "V", "title": "T", "source": "S"}])
        );
        assert_eq!(value["widgets"][0]["type"], json!("indicator"));
    }

    #[test]
    fn test_summary_serializes_pivot_value_field() {
        let summary = extract_dashboard(&json!({"widgets": [{
            "type": "pivot2",
            "metadata": {"panels": [{"name": "rows",
                "items": [{"jaql": {"title": "Region", "table": "Geo", "column": "Region"}}]}]}
        }]}));
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value["pivots"],
            json!([{"panel": "rows", "title": "Region", "value": "Geo.Region"}])
        );
    }
}
