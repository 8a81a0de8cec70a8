use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;

use crate::config::DashcompareConfig;
use crate::core::Error;
use crate::source::{load_dashboard, load_from_file, DashboardInput, HttpSource};

/// Resolves dashboard inputs to raw documents, reusing one HTTP source per environment.
pub struct DashboardLoader<'a> {
    config: &'a DashcompareConfig,
    sources: HashMap<String, HttpSource>,
}

impl<'a> DashboardLoader<'a> {
    pub fn new(config: &'a DashcompareConfig) -> Self {
        Self {
            config,
            sources: HashMap::new(),
        }
    }

    /// Load one input. Errors name the dashboard and where it was looked up.
    pub fn load(&mut self, input: &DashboardInput) -> Result<Value> {
        match input {
            DashboardInput::File(path) => {
                load_from_file(path).with_context(|| format!("Failed to load dashboard {input}"))
            }
            DashboardInput::Remote { environment, id } => {
                let source = self.source(environment)?;
                load_dashboard(source, id)
                    .map_err(|e| match e {
                        not_found @ Error::DashboardNotFound { .. } => not_found,
                        other => Error::retrieval(input.to_string(), other.to_string()),
                    })
                    .map_err(anyhow::Error::from)
            }
        }
    }

    fn source(&mut self, environment: &str) -> Result<&HttpSource> {
        if !self.sources.contains_key(environment) {
            let resolved = self.config.environment(environment)?;
            let source = HttpSource::new(resolved, self.config.retry.clone())
                .with_context(|| format!("Failed to set up environment '{environment}'"))?;
            self.sources.insert(environment.to_string(), source);
        }
        self.sources
            .get(environment)
            .ok_or_else(|| anyhow::anyhow!("environment '{environment}' unavailable"))
    }
}
