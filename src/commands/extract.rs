use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;

use super::loading::DashboardLoader;
use crate::config::DashcompareConfig;
use crate::extraction::{extract_dashboard, DashboardSummary};
use crate::source::DashboardInput;

pub struct ExtractConfig {
    pub input: DashboardInput,
    pub raw_html: bool,
}

/// JSON form of a summary; the raw rich-text HTML is only kept on request.
pub fn summary_json(summary: &DashboardSummary, raw_html: bool) -> Result<Value> {
    let mut value = serde_json::to_value(summary).context("Failed to serialize summary")?;
    if !raw_html {
        if let Some(map) = value.as_object_mut() {
            map.remove("rich_text_html");
        }
    }
    Ok(value)
}

pub fn extract_one(config: ExtractConfig, settings: &DashcompareConfig) -> Result<()> {
    let mut loader = DashboardLoader::new(settings);
    let raw = loader.load(&config.input)?;
    let summary = extract_dashboard(&raw);
    log::info!(
        "Extracted '{}': {} filters, {} widgets, {} indicators, {} pivot columns",
        summary.title,
        summary.filters.len(),
        summary.widgets.len(),
        summary.indicators.len(),
        summary.pivots.len()
    );

    let value = summary_json(&summary, config.raw_html)?;
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &value)?;
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_json_hides_raw_html_by_default() {
        let summary = extract_dashboard(&json!({
            "title": "Notes",
            "widgets": [{"type": "richtexteditor", "style": {"content": {"html": "<b>Hi</b>"}}}]
        }));

        let plain = summary_json(&summary, false).unwrap();
        assert_eq!(plain["rich_text"], json!(["Hi"]));
        assert!(plain.get("rich_text_html").is_none());

        let raw = summary_json(&summary, true).unwrap();
        assert_eq!(raw["rich_text_html"], json!(["<b>Hi</b>"]));
    }

    #[test]
    fn test_summary_json_shapes() {
        let summary = extract_dashboard(&json!({
            "widgets": [{"title": "KPI", "type": "indicator",
                         "metadata": {"panels": [{"name": "value",
                             "items": [{"jaql": {"title": "Revenue",
                                 "context": {"[a]": {"title": "Sales"}}}}]}]}}]
        }));
        let value = summary_json(&summary, false).unwrap();
        assert_eq!(value["title"], "Untitled");
        assert_eq!(value["widgets"], json!([{"title": "KPI", "type": "indicator"}]));
        assert_eq!(
            value["indicators"],
            json!([{"panel": "value", "title": "Revenue", "source": "Sales"}])
        );
    }
}
