use anyhow::Result;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use super::loading::DashboardLoader;
use crate::comparison::{pairwise_diff, reconcile, Category, Comparison, DashboardSet, ListDiff};
use crate::config::DashcompareConfig;
use crate::extraction::extract_dashboard;
use crate::formatting::{FormattingConfig, Markers};
use crate::io::{self, create_writer, ComparisonReport, OutputFormat};
use crate::source::DashboardInput;

pub const MIN_DASHBOARDS: usize = 2;
pub const MAX_DASHBOARDS: usize = 10;

pub struct CompareConfig {
    pub inputs: Vec<DashboardInput>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub pairwise: bool,
    pub formatting: FormattingConfig,
}

/// Check the inputs before any retrieval happens: count within bounds, no input given twice.
pub fn validate_inputs(inputs: &[DashboardInput]) -> Result<()> {
    if !(MIN_DASHBOARDS..=MAX_DASHBOARDS).contains(&inputs.len()) {
        anyhow::bail!(
            "Expected between {MIN_DASHBOARDS} and {MAX_DASHBOARDS} dashboards, got {}",
            inputs.len()
        );
    }
    for (i, input) in inputs.iter().enumerate() {
        if inputs[..i].contains(input) {
            anyhow::bail!("Dashboard {input} given more than once");
        }
    }
    Ok(())
}

/// Key and column label for `input`, distinct from every key already in `dashboards`.
///
/// Two exports sharing a file stem (`qa/revenue.dash`, `prod/revenue.dash`)
/// get numbered keys and are labelled by their full path.
fn unique_column(
    dashboards: &DashboardSet,
    input: &DashboardInput,
    title: &str,
) -> (String, String) {
    let key = input.key();
    if dashboards.get(&key).is_none() {
        return (key, input.column_label(title));
    }
    let mut n = 2;
    let mut numbered = format!("{key}_{n}");
    while dashboards.get(&numbered).is_some() {
        n += 1;
        numbered = format!("{key}_{n}");
    }
    (numbered, format!("{title} ({input})"))
}

/// Load, extract and reconcile every input. Stops at the first dashboard that fails to load.
pub fn build_comparison(
    inputs: &[DashboardInput],
    loader: &mut DashboardLoader<'_>,
) -> Result<(DashboardSet, Comparison)> {
    let mut dashboards = DashboardSet::new();
    for input in inputs {
        let raw = loader.load(input)?;
        let summary = extract_dashboard(&raw);
        log::info!("Loaded '{}' from {}", summary.title, input);
        let (key, label) = unique_column(&dashboards, input, &summary.title);
        dashboards.insert(key, label, summary);
    }
    if dashboards.len() != inputs.len() {
        anyhow::bail!(
            "Compared {} of {} dashboards; inputs must be distinct",
            dashboards.len(),
            inputs.len()
        );
    }
    let comparison = reconcile(&dashboards);
    Ok((dashboards, comparison))
}

/// Two-way diffs of the single-label categories, or `None` unless exactly two dashboards.
pub fn pairwise_diffs(
    dashboards: &DashboardSet,
) -> Option<BTreeMap<Category, ListDiff>> {
    let entries: Vec<_> = dashboards.iter().collect();
    let [first, second] = entries.as_slice() else {
        return None;
    };
    Some(
        Category::ALL
            .iter()
            .filter_map(|&category| {
                pairwise_diff(category, &first.summary, &second.summary).map(|d| (category, d))
            })
            .collect(),
    )
}

pub fn compare_dashboards(config: CompareConfig, settings: &DashcompareConfig) -> Result<()> {
    validate_inputs(&config.inputs)?;

    let mut loader = DashboardLoader::new(settings);
    let (dashboards, comparison) = build_comparison(&config.inputs, &mut loader)?;

    let mut report = ComparisonReport::new(comparison);
    if config.pairwise {
        match pairwise_diffs(&dashboards) {
            Some(diffs) => report = report.with_pairwise(diffs),
            None => log::warn!(
                "--pairwise needs exactly two dashboards; got {}",
                dashboards.len()
            ),
        }
    }

    let formatting = match config.output {
        Some(_) => config.formatting.for_file(),
        None => config.formatting,
    };
    let markers = Markers::resolve(
        &formatting,
        settings.present_marker(),
        settings.absent_marker(),
    );
    let mut destination = io::open_destination(config.output.as_deref())?;
    {
        let mut writer = create_writer(
            config.format,
            Box::new(&mut destination),
            formatting,
            markers,
        );
        writer.write_report(&report)?;
    }
    destination.flush()?;

    if let Some(path) = &config.output {
        log::info!("Wrote comparison to {}", path.display());
    }
    Ok(())
}
