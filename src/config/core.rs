use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::retry::RetryConfig;
use crate::core::{Error, Result};

/// Root configuration structure for dashcompare
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DashcompareConfig {
    /// Dashboard service environments keyed by short name (e.g. `qa`, `prod`)
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,

    /// Retry policy for service requests
    #[serde(default)]
    pub retry: RetryConfig,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentConfig {
    /// Service root, e.g. `https://qa.example.net`
    pub base_url: String,
    /// API token sent as a bearer credential
    #[serde(default)]
    pub token: Option<String>,
    /// Environment variable holding the token, consulted when `token` is absent
    #[serde(default)]
    pub token_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    pub default_format: Option<String>,
    /// Cell text for "present" (default: a check mark, or `x` in plain mode)
    #[serde(default)]
    pub present_marker: Option<String>,
    /// Cell text for "absent" (default: empty)
    #[serde(default)]
    pub absent_marker: Option<String>,
}

/// A resolved environment: name, normalized base URL and credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    pub base_url: String,
    pub token: Option<String>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl EnvironmentConfig {
    /// Resolve the token and validate the base URL.
    pub fn resolve(&self, name: &str) -> Result<Environment> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Configuration(format!(
                "environment '{name}' has invalid base_url '{}': expected http:// or https://",
                self.base_url
            )));
        }

        let token = self
            .token
            .clone()
            .or_else(|| {
                self.token_env.as_deref().and_then(|var| match std::env::var(var) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        log::warn!("Token variable {var} for environment '{name}' is not set");
                        None
                    }
                })
            })
            .filter(|t| !t.trim().is_empty());

        Ok(Environment {
            name: name.to_string(),
            base_url,
            token,
        })
    }
}

impl DashcompareConfig {
    /// Look up and resolve a configured environment.
    pub fn environment(&self, name: &str) -> Result<Environment> {
        self.environments
            .get(name)
            .ok_or_else(|| Error::UnknownEnvironment(name.to_string()))?
            .resolve(name)
    }

    pub fn environment_names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output.as_ref()?.default_format.as_deref()
    }

    pub fn present_marker(&self) -> Option<&str> {
        self.output.as_ref()?.present_marker.as_deref()
    }

    pub fn absent_marker(&self) -> Option<&str> {
        self.output.as_ref()?.absent_marker.as_deref()
    }
}
