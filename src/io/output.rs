use chrono::{DateTime, Utc};
use comfy_table::{presets, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::comparison::{Category, Comparison, ComparisonTable, ListDiff};
use crate::formatting::{ColoredFormatter, FormattingConfig, Markers, OutputFormatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            "terminal" => Some(Self::Terminal),
            _ => None,
        }
    }
}

/// Everything one `compare` run renders.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub comparison: Comparison,
    /// Two-way diffs of the single-label categories, when exactly two dashboards were compared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairwise: Option<BTreeMap<Category, ListDiff>>,
}

impl ComparisonReport {
    pub fn new(comparison: Comparison) -> Self {
        Self {
            generated_at: Utc::now(),
            comparison,
            pairwise: None,
        }
    }

    pub fn with_pairwise(mut self, pairwise: BTreeMap<Category, ListDiff>) -> Self {
        self.pairwise = Some(pairwise);
        self
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &ComparisonReport) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &ComparisonReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
    markers: Markers,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W, markers: Markers) -> Self {
        Self { writer, markers }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &ComparisonReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        for table in report.comparison.tables() {
            self.write_table(table)?;
        }
        if let Some(pairwise) = &report.pairwise {
            self.write_pairwise(&report.comparison, pairwise)?;
        }
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &ComparisonReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Dashboard Comparison")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        for column in &report.comparison.columns {
            writeln!(self.writer, "- **{}** (`{}`)", escape_md(&column.label), column.key)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_table(&mut self, table: &ComparisonTable) -> anyhow::Result<()> {
        writeln!(self.writer, "## {}", table.category.heading())?;
        writeln!(self.writer)?;

        if table.is_empty() {
            writeln!(self.writer, "_No items._")?;
            writeln!(self.writer)?;
            return Ok(());
        }

        let header: Vec<String> = table
            .category
            .label_headers()
            .iter()
            .map(|h| h.to_string())
            .chain(table.columns.iter().map(|c| escape_md(&c.label)))
            .collect();
        writeln!(self.writer, "| {} |", header.join(" | "))?;
        writeln!(
            self.writer,
            "|{}|",
            header.iter().map(|_| "---").collect::<Vec<_>>().join("|")
        )?;

        for row in &table.rows {
            let cells: Vec<String> = row
                .labels
                .iter()
                .map(|l| escape_md(l))
                .chain(row.presence.iter().map(|p| self.markers.cell(*p).to_string()))
                .collect();
            writeln!(self.writer, "| {} |", cells.join(" | "))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_pairwise(
        &mut self,
        comparison: &Comparison,
        pairwise: &BTreeMap<Category, ListDiff>,
    ) -> anyhow::Result<()> {
        let (first, second) = match comparison.columns.as_slice() {
            [a, b] => (escape_md(&a.label), escape_md(&b.label)),
            _ => return Ok(()),
        };
        writeln!(self.writer, "## Pairwise Differences")?;
        writeln!(self.writer)?;
        for (category, diff) in pairwise {
            writeln!(self.writer, "### {}", category.heading())?;
            writeln!(self.writer)?;
            write_md_list(&mut self.writer, &format!("Only in {first}"), &diff.only_in_first)?;
            write_md_list(&mut self.writer, &format!("Only in {second}"), &diff.only_in_second)?;
            write_md_list(&mut self.writer, "Common", &diff.common)?;
        }
        Ok(())
    }
}

fn write_md_list<W: Write>(writer: &mut W, title: &str, items: &[String]) -> anyhow::Result<()> {
    writeln!(writer, "**{}** ({})", title, items.len())?;
    writeln!(writer)?;
    for item in items {
        writeln!(writer, "- {}", escape_md(item))?;
    }
    if !items.is_empty() {
        writeln!(writer)?;
    }
    Ok(())
}

fn escape_md(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    formatting: FormattingConfig,
    formatter: ColoredFormatter,
    markers: Markers,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig, markers: Markers) -> Self {
        Self {
            writer,
            formatting,
            formatter: ColoredFormatter::new(formatting),
            markers,
        }
    }

    fn build_table(&self, table: &ComparisonTable) -> Table {
        let mut rendered = Table::new();
        if self.formatting.emoji.should_use_emoji() {
            rendered.load_preset(presets::UTF8_FULL);
        } else {
            rendered.load_preset(presets::ASCII_FULL);
        }
        rendered.set_content_arrangement(ContentArrangement::Dynamic);

        let header: Vec<String> = table
            .category
            .label_headers()
            .iter()
            .map(|h| h.to_string())
            .chain(table.columns.iter().map(|c| c.label.clone()))
            .collect();
        rendered.set_header(header);

        for row in &table.rows {
            let cells: Vec<Cell> = row
                .labels
                .iter()
                .map(Cell::new)
                .chain(row.presence.iter().map(|p| Cell::new(self.markers.cell(*p))))
                .collect();
            rendered.add_row(cells);
        }
        rendered
    }

    fn write_table(&mut self, table: &ComparisonTable) -> anyhow::Result<()> {
        let differing = table.differing_rows().count();
        let icon = self.formatter.emoji(category_emoji(table.category), "##");
        let heading = self.formatter.header(table.category.heading());
        let counts = format!("({} items, {} differ)", table.rows.len(), differing);
        let counts = if differing > 0 {
            self.formatter.warning(&counts)
        } else {
            self.formatter.dim(&counts)
        };
        writeln!(self.writer, "{icon} {heading} {counts}")?;

        if table.is_empty() {
            writeln!(self.writer, "  {}", self.formatter.dim("no items"))?;
        } else {
            writeln!(self.writer, "{}", self.build_table(table))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_pairwise(
        &mut self,
        comparison: &Comparison,
        pairwise: &BTreeMap<Category, ListDiff>,
    ) -> anyhow::Result<()> {
        let [first, second] = comparison.columns.as_slice() else {
            return Ok(());
        };
        writeln!(self.writer, "{}", self.formatter.header("Pairwise Differences"))?;
        for (category, diff) in pairwise {
            writeln!(self.writer, "  {}:", category.heading())?;
            for item in &diff.only_in_first {
                writeln!(self.writer, "    {} {item}", self.formatter.error(&format!("- only in {}:", first.label)))?;
            }
            for item in &diff.only_in_second {
                writeln!(self.writer, "    {} {item}", self.formatter.success(&format!("+ only in {}:", second.label)))?;
            }
            writeln!(self.writer, "    {}", self.formatter.dim(&format!("{} in common", diff.common.len())))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &ComparisonReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.formatter.header("Dashboard Comparison"))?;
        writeln!(self.writer, "{}", self.formatter.header("===================="))?;
        for column in &report.comparison.columns {
            writeln!(self.writer, "  {} {}", column.label, self.formatter.dim(&format!("[{}]", column.key)))?;
        }
        writeln!(self.writer)?;

        for table in report.comparison.tables() {
            self.write_table(table)?;
        }

        if let Some(pairwise) = &report.pairwise {
            self.write_pairwise(&report.comparison, pairwise)?;
        }

        let verdict = if report.comparison.is_identical() {
            self.formatter.success("All compared metadata matches.")
        } else {
            self.formatter.warning("Dashboards differ.")
        };
        writeln!(self.writer, "{verdict}")?;
        Ok(())
    }
}

fn category_emoji(category: Category) -> &'static str {
    match category {
        Category::Filters => "🎯",
        Category::WidgetTitles => "🧩",
        Category::WidgetTypes => "⚙️",
        Category::RichText => "📝",
        Category::Indicators => "📌",
        Category::Pivots => "🧠",
    }
}

pub fn create_writer<'a>(
    format: OutputFormat,
    destination: Box<dyn Write + 'a>,
    formatting: FormattingConfig,
    markers: Markers,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(destination, markers)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(destination, formatting, markers)),
    }
}
