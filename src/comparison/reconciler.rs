use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::comparison::types::*;
use crate::extraction::{DashboardSummary, Triple};

/// A summary together with its column identity.
#[derive(Debug, Clone)]
pub struct LabeledSummary {
    pub key: String,
    pub label: String,
    pub summary: DashboardSummary,
}

/// Ordered mapping from dashboard key to labeled summary.
///
/// Insertion order is column order. Inserting an existing key replaces that
/// entry in place.
#[derive(Debug, Clone, Default)]
pub struct DashboardSet {
    entries: Vec<LabeledSummary>,
}

impl DashboardSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        summary: DashboardSummary,
    ) {
        let entry = LabeledSummary {
            key: key.into(),
            label: label.into(),
            summary,
        };
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, key: &str) -> Option<&LabeledSummary> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabeledSummary> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn columns(&self) -> Vec<DashboardColumn> {
        self.entries
            .iter()
            .map(|e| DashboardColumn {
                key: e.key.clone(),
                label: e.label.clone(),
            })
            .collect()
    }
}

/// Line up every category of every dashboard into presence tables.
///
/// Always returns one table per [`Category`], possibly with zero rows.
pub fn reconcile(dashboards: &DashboardSet) -> Comparison {
    let columns = dashboards.columns();
    let tables: BTreeMap<Category, ComparisonTable> = Category::ALL
        .iter()
        .map(|&category| {
            let rows = match category {
                Category::Filters => {
                    single_label_rows(dashboards, |s| s.filters.iter().map(String::as_str).collect())
                }
                Category::WidgetTitles => {
                    single_label_rows(dashboards, |s| s.widget_titles().collect())
                }
                Category::WidgetTypes => single_label_rows(dashboards, |s| s.widget_types().collect()),
                Category::RichText => {
                    single_label_rows(dashboards, |s| s.rich_text.iter().map(String::as_str).collect())
                }
                Category::Indicators => triple_rows(dashboards, |s| s.indicators.iter().collect()),
                Category::Pivots => triple_rows(dashboards, |s| s.pivots.iter().collect()),
            };
            let table = ComparisonTable {
                category,
                columns: columns.clone(),
                rows,
            };
            (category, table)
        })
        .collect();

    log::debug!(
        "Reconciled {} dashboards: {}",
        dashboards.len(),
        tables
            .values()
            .map(|t| format!("{}={}", t.category.heading(), t.rows.len()))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Comparison { columns, tables }
}

/// Rows for a single-label category: exact string union, sorted, membership per dashboard.
fn single_label_rows<'a, F>(dashboards: &'a DashboardSet, items: F) -> Vec<ComparisonRow>
where
    F: Fn(&'a DashboardSummary) -> HashSet<&'a str>,
{
    let per_dashboard: Vec<HashSet<&str>> = dashboards.iter().map(|d| items(&d.summary)).collect();
    let union: BTreeSet<&str> = per_dashboard.iter().flatten().copied().collect();

    union
        .into_iter()
        .map(|item| ComparisonRow {
            labels: vec![item.to_string()],
            presence: per_dashboard.iter().map(|set| set.contains(item)).collect(),
        })
        .collect()
}

/// Rows for a triple category: tuple union, sorted by full tuple, membership per dashboard.
fn triple_rows<'a, F>(dashboards: &'a DashboardSet, items: F) -> Vec<ComparisonRow>
where
    F: Fn(&'a DashboardSummary) -> HashSet<&'a Triple>,
{
    let per_dashboard: Vec<HashSet<&Triple>> = dashboards.iter().map(|d| items(&d.summary)).collect();
    let union: BTreeSet<&Triple> = per_dashboard.iter().flatten().copied().collect();

    union
        .into_iter()
        .map(|triple| ComparisonRow {
            labels: triple.fields().iter().map(|f| f.to_string()).collect(),
            presence: per_dashboard.iter().map(|set| set.contains(triple)).collect(),
        })
        .collect()
}

/// Two-way set comparison of the single-label `category` between two summaries.
///
/// Returns `None` for triple categories.
pub fn pairwise_diff(
    category: Category,
    first: &DashboardSummary,
    second: &DashboardSummary,
) -> Option<ListDiff> {
    let items = |s: &DashboardSummary| -> Vec<String> {
        match category {
            Category::Filters => s.filters.clone(),
            Category::WidgetTitles => s.widget_titles().map(str::to_string).collect(),
            Category::WidgetTypes => s.widget_types().map(str::to_string).collect(),
            Category::RichText => s.rich_text.clone(),
            Category::Indicators | Category::Pivots => Vec::new(),
        }
    };
    if !category.is_single_label() {
        return None;
    }
    Some(diff_lists(&items(first), &items(second)))
}

/// Sorted set difference and intersection of two string lists.
pub fn diff_lists(first: &[String], second: &[String]) -> ListDiff {
    let a: BTreeSet<&String> = first.iter().collect();
    let b: BTreeSet<&String> = second.iter().collect();
    ListDiff {
        only_in_first: a.difference(&b).map(|s| s.to_string()).collect(),
        only_in_second: b.difference(&a).map(|s| s.to_string()).collect(),
        common: a.intersection(&b).map(|s| s.to_string()).collect(),
    }
}
