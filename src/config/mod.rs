//! Configuration for dashcompare.
//!
//! Settings live in `.dashcompare.toml`, found by walking up from the
//! current directory or passed with `--config`:
//!
//! ```toml
//! [environments.qa]
//! base_url = "https://qa.example.net"
//! token_env = "QA_TOKEN"
//!
//! [environments.prod]
//! base_url = "https://prod.example.net"
//! token = "..."
//!
//! [retry]
//! max_retries = 2
//! strategy = "exponential"
//!
//! [output]
//! default_format = "terminal"
//! ```

mod core;
mod loader;
pub mod retry;

pub use core::{DashcompareConfig, Environment, EnvironmentConfig, OutputConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use retry::{RetryConfig, RetryStrategy};

/// Commented starter config written by `dashcompare init`.
pub const DEFAULT_CONFIG: &str = r#"# dashcompare configuration

# One table per dashboard service environment. The table name is the
# environment name used on the command line: `dashcompare compare qa:<id> prod:<id>`.
[environments.qa]
base_url = "https://qa.example.net"
# token = "..."
token_env = "DASHCOMPARE_QA_TOKEN"

[environments.prod]
base_url = "https://prod.example.net"
token_env = "DASHCOMPARE_PROD_TOKEN"

[retry]
enabled = true
max_retries = 2
base_delay_ms = 200
strategy = "exponential"
timeout_seconds = 30

[output]
default_format = "terminal"
"#;
