use anyhow::Result;

use crate::config::DashcompareConfig;
use crate::formatting::{ColoredFormatter, FormattingConfig, OutputFormatter};
use crate::source::HttpSource;

/// Outcome of probing one environment.
#[derive(Debug)]
pub struct CheckOutcome {
    pub environment: String,
    pub result: std::result::Result<(), String>,
}

/// Environments to probe: the requested ones, or all configured.
pub fn select_environments(settings: &DashcompareConfig, requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        settings.environment_names().map(str::to_string).collect()
    } else {
        requested.to_vec()
    }
}

fn probe(settings: &DashcompareConfig, name: &str) -> std::result::Result<(), String> {
    let environment = settings.environment(name).map_err(|e| e.to_string())?;
    let source =
        HttpSource::new(environment, settings.retry.clone()).map_err(|e| e.to_string())?;
    source.check_connection().map_err(|e| e.to_string())
}

pub fn check_environments(
    settings: &DashcompareConfig,
    requested: &[String],
    formatting: FormattingConfig,
) -> Result<()> {
    let names = select_environments(settings, requested);
    if names.is_empty() {
        anyhow::bail!("No environments configured. Run `dashcompare init` to create a config.");
    }

    let formatter = ColoredFormatter::new(formatting);
    let outcomes: Vec<CheckOutcome> = names
        .into_iter()
        .map(|environment| {
            let result = probe(settings, &environment);
            CheckOutcome {
                environment,
                result,
            }
        })
        .collect();

    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("{}", formatter.success(&format!("{}: ok", outcome.environment))),
            Err(message) => println!(
                "{}",
                formatter.error(&format!("{}: {message}", outcome.environment))
            ),
        }
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} environments failed the check", outcomes.len());
    }
    Ok(())
}
