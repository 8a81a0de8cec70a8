use anyhow::Result;
use clap::Parser;
use dashcompare::cli::{Cli, Commands};
use dashcompare::commands::{self, CompareConfig, ExtractConfig};
use dashcompare::config::{self, DashcompareConfig};
use dashcompare::formatting::FormattingConfig;
use dashcompare::io::OutputFormat;
use env_logger::Env;

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbosity);

    match cli.command {
        Commands::Init { force } => commands::init_config(force),
        Commands::Compare {
            inputs,
            format,
            output,
            pairwise,
            plain,
        } => {
            let settings = config::load_config(cli.config.as_deref())?;
            let compare_config = CompareConfig {
                inputs,
                format: resolve_format(format, &settings),
                output,
                pairwise,
                formatting: formatting_for(plain),
            };
            commands::compare_dashboards(compare_config, &settings)
        }
        Commands::Extract { input, raw_html } => {
            let settings = config::load_config(cli.config.as_deref())?;
            commands::extract_one(ExtractConfig { input, raw_html }, &settings)
        }
        Commands::Check { environments } => {
            let settings = config::load_config(cli.config.as_deref())?;
            commands::check_environments(&settings, &environments, FormattingConfig::from_env())
        }
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

// CLI flag, then `output.default_format`, then terminal
fn resolve_format(
    flag: Option<dashcompare::cli::OutputFormat>,
    settings: &DashcompareConfig,
) -> OutputFormat {
    flag.map(OutputFormat::from)
        .or_else(|| settings.default_format().and_then(OutputFormat::parse))
        .unwrap_or(OutputFormat::Terminal)
}

fn formatting_for(plain: bool) -> FormattingConfig {
    if plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    }
}
