//! CLI command implementations for dashcompare.
//!
//! Available commands:
//! - **compare**: Reconcile two to ten dashboards into per-category presence tables
//! - **extract**: Print the extracted metadata of one dashboard
//! - **check**: Probe connectivity and credentials of configured environments
//! - **init**: Write a starter `.dashcompare.toml`

pub mod check;
pub mod compare;
pub mod extract;
pub mod init;
pub mod loading;

pub use check::check_environments;
pub use compare::{compare_dashboards, CompareConfig};
pub use extract::{extract_one, ExtractConfig};
pub use init::init_config;
pub use loading::DashboardLoader;
