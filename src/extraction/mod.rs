//! Extraction of comparable metadata from raw dashboard JSON.

pub mod dashboard;
pub mod formula;
pub mod html;
pub mod json_access;

pub use dashboard::{
    extract_dashboard, resolve_widgets, DashboardSummary, IndicatorSet, Triple, WidgetInfo,
    UNTITLED,
};
pub use formula::expand_formula;
pub use html::strip_html_tags;
