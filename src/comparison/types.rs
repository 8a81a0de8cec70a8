use serde::Serialize;
use std::collections::BTreeMap;

/// A comparable slice of dashboard metadata. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Filters,
    WidgetTitles,
    WidgetTypes,
    RichText,
    Indicators,
    Pivots,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Filters,
        Category::WidgetTitles,
        Category::WidgetTypes,
        Category::RichText,
        Category::Indicators,
        Category::Pivots,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            Category::Filters => "Filters",
            Category::WidgetTitles => "Widget Titles",
            Category::WidgetTypes => "Widget Types",
            Category::RichText => "Rich Text (Cleaned)",
            Category::Indicators => "Indicators",
            Category::Pivots => "Pivot Columns",
        }
    }

    /// Column headers for the label fields of a row.
    pub fn label_headers(&self) -> &'static [&'static str] {
        match self {
            Category::Filters => &["Filter"],
            Category::WidgetTitles => &["Widget Title"],
            Category::WidgetTypes => &["Widget Type"],
            Category::RichText => &["Rich Text"],
            Category::Indicators => &["Panel", "Title", "Source"],
            Category::Pivots => &["Panel", "Title", "Formula/Column"],
        }
    }

    pub fn is_single_label(&self) -> bool {
        self.label_headers().len() == 1
    }
}

/// One dashboard column of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardColumn {
    /// Caller-chosen unique key, e.g. `qa_1a2b3c`.
    pub key: String,
    /// Display label, e.g. `Revenue Overview (qa)`.
    pub label: String,
}

/// One item and where it appears. `presence[i]` belongs to column `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub labels: Vec<String>,
    pub presence: Vec<bool>,
}

impl ComparisonRow {
    pub fn present_in(&self, column: usize) -> bool {
        self.presence.get(column).copied().unwrap_or(false)
    }

    pub fn present_everywhere(&self) -> bool {
        self.presence.iter().all(|p| *p)
    }
}

/// Presence matrix for one category: rows sorted by label tuple, one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonTable {
    pub category: Category,
    pub columns: Vec<DashboardColumn>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// Row whose labels equal `labels` exactly.
    pub fn row(&self, labels: &[&str]) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| {
            row.labels.len() == labels.len()
                && row.labels.iter().zip(labels).all(|(a, b)| a == b)
        })
    }

    /// Presence of the row `labels` in the dashboard keyed `key`; `None` if either is unknown.
    pub fn presence(&self, labels: &[&str], key: &str) -> Option<bool> {
        let column = self.column_index(key)?;
        self.row(labels).map(|row| row.present_in(column))
    }

    /// Rows missing from at least one dashboard.
    pub fn differing_rows(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|row| !row.present_everywhere())
    }
}

/// All category tables of one comparison request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub columns: Vec<DashboardColumn>,
    pub tables: BTreeMap<Category, ComparisonTable>,
}

impl Comparison {
    pub fn table(&self, category: Category) -> Option<&ComparisonTable> {
        self.tables.get(&category)
    }

    pub fn tables(&self) -> impl Iterator<Item = &ComparisonTable> {
        self.tables.values()
    }

    /// True when every row of every table is present in every dashboard.
    pub fn is_identical(&self) -> bool {
        self.tables().all(|t| t.differing_rows().next().is_none())
    }
}

/// Two-way set difference of a single-label category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListDiff {
    pub only_in_first: Vec<String>,
    pub only_in_second: Vec<String>,
    pub common: Vec<String>,
}

impl ListDiff {
    pub fn is_same(&self) -> bool {
        self.only_in_first.is_empty() && self.only_in_second.is_empty()
    }
}
