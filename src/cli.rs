use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::source::DashboardInput;

#[derive(Parser, Debug)]
#[command(name = "dashcompare")]
#[command(about = "Extract and compare BI dashboard metadata across environments", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the nearest .dashcompare.toml)
    #[arg(short, long, global = true, env = "DASHCOMPARE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare dashboards and print presence tables per category
    Compare {
        /// Dashboards as <environment>:<dashboard_id> or paths to .json/.dash exports
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<DashboardInput>,

        /// Output format (defaults to output.default_format, then terminal)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also list two-way differences (exactly two dashboards)
        #[arg(long)]
        pairwise: bool,

        /// Plain output: no colors, no emoji
        #[arg(long)]
        plain: bool,
    },

    /// Print the extracted metadata of one dashboard as JSON
    Extract {
        /// Dashboard as <environment>:<dashboard_id> or path to a .json/.dash export
        input: DashboardInput,

        /// Include the raw HTML of rich-text widgets
        #[arg(long = "raw-html")]
        raw_html: bool,
    },

    /// Check connectivity and credentials of configured environments
    Check {
        /// Environments to check (defaults to all configured)
        environments: Vec<String>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}
