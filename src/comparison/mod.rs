//! Cross-dashboard comparison.
//!
//! The reconciler takes any number of extracted summaries, each keyed by a
//! caller-chosen unique key and carrying a display label, and produces one
//! presence table per [`Category`]. Rows are the union of the category's
//! items across all dashboards, sorted by label; each cell records whether
//! that dashboard has the item.

pub mod reconciler;
pub mod types;

pub use reconciler::{diff_lists, pairwise_diff, reconcile, DashboardSet, LabeledSummary};
pub use types::{
    Category, Comparison, ComparisonRow, ComparisonTable, DashboardColumn, ListDiff,
};
