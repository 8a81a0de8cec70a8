// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod core;
pub mod extraction;
pub mod formatting;
pub mod io;
pub mod source;

// Re-export commonly used types
pub use crate::core::{Error, Result};

pub use crate::extraction::{
    expand_formula, extract_dashboard, strip_html_tags, DashboardSummary, IndicatorSet, Triple,
    WidgetInfo,
};

pub use crate::comparison::{
    pairwise_diff, reconcile, Category, Comparison, ComparisonRow, ComparisonTable,
    DashboardColumn, DashboardSet, ListDiff,
};

pub use crate::source::{load_dashboard, DashboardInput, DashboardSource, HttpSource};

pub use crate::io::output::{create_writer, ComparisonReport, OutputFormat, OutputWriter};
