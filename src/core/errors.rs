//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dashcompare operations
#[derive(Debug, Error)]
pub enum Error {
    /// The dashboard service answered "not found" for the dashboard and its export
    #[error("Dashboard {dashboard} not found in environment {environment}")]
    DashboardNotFound {
        dashboard: String,
        environment: String,
    },

    /// Retrieval failed for a specific dashboard input
    #[error("Failed to load dashboard {dashboard}: {message}")]
    Retrieval { dashboard: String, message: String },

    /// Non-success HTTP status other than 404
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A dashboard input referenced an environment missing from the config
    #[error("Unknown environment '{0}'. Add it under [environments] in .dashcompare.toml")]
    UnknownEnvironment(String),

    /// Reading a named file failed
    #[error("Failed to read {}: {source}", path.display())]
    FileSystemAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed command-line input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// HTTP transport errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a retrieval error for a dashboard input
    pub fn retrieval(dashboard: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Retrieval {
            dashboard: dashboard.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Transport failures and 5xx responses are transient; everything else,
    /// including "not found", is final.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_dashboard_and_environment() {
        let err = Error::DashboardNotFound {
            dashboard: "abc123".to_string(),
            environment: "qa".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Dashboard abc123 not found in environment qa"
        );
    }

    #[test]
    fn test_with_context_wraps_message() {
        let err = Error::Configuration("missing base_url".to_string())
            .with_context("Loading environment qa");
        assert_eq!(
            err.to_string(),
            "Loading environment qa: Configuration error: missing base_url"
        );
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(Error::InvalidInput("empty id".to_string()));
        let err = result.context("Parsing input").unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
    }

    #[test]
    fn test_transient_classification() {
        assert!(Error::Server {
            status: 503,
            message: String::new()
        }
        .is_transient());
        assert!(!Error::Server {
            status: 401,
            message: String::new()
        }
        .is_transient());
        assert!(!Error::DashboardNotFound {
            dashboard: "x".into(),
            environment: "y".into()
        }
        .is_transient());
    }
}
