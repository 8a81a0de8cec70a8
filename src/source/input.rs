use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::Error;

/// One dashboard to compare, as given on the command line.
///
/// `<env>:<dashboard_id>` names a dashboard in a configured environment; a
/// path ending in `.json` or `.dash` (or any existing file) is a saved export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardInput {
    Remote { environment: String, id: String },
    File(PathBuf),
}

impl DashboardInput {
    /// Unique key: `{env}_{id}` for remote dashboards, `file_{stem}` for files.
    pub fn key(&self) -> String {
        match self {
            Self::Remote { environment, id } => format!("{environment}_{id}"),
            Self::File(path) => format!("file_{}", file_stem(path)),
        }
    }

    /// Source label used to decorate the column title.
    pub fn source_label(&self) -> String {
        match self {
            Self::Remote { environment, .. } => environment.clone(),
            Self::File(path) => file_stem(path),
        }
    }

    /// Column label for a dashboard with the given extracted title.
    pub fn column_label(&self, title: &str) -> String {
        format!("{title} ({})", self.source_label())
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn looks_like_file(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.ends_with(".json") || lower.ends_with(".dash") || Path::new(s).is_file()
}

impl FromStr for DashboardInput {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if looks_like_file(s) {
            return Ok(Self::File(PathBuf::from(s)));
        }

        match s.split_once(':') {
            Some((environment, id)) if !environment.is_empty() && !id.is_empty() => {
                Ok(Self::Remote {
                    environment: environment.to_string(),
                    id: id.to_string(),
                })
            }
            _ => Err(Error::InvalidInput(format!(
                "'{s}': expected <environment>:<dashboard_id> or a .json/.dash file"
            ))),
        }
    }
}

impl fmt::Display for DashboardInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { environment, id } => write!(f, "{id} ({environment})"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote() {
        let input: DashboardInput = "qa:5f1e2d".parse().unwrap();
        assert_eq!(
            input,
            DashboardInput::Remote {
                environment: "qa".into(),
                id: "5f1e2d".into()
            }
        );
        assert_eq!(input.key(), "qa_5f1e2d");
        assert_eq!(input.column_label("Revenue"), "Revenue (qa)");
    }

    #[test]
    fn test_parse_file() {
        let input: DashboardInput = "exports/Revenue.dash".parse().unwrap();
        assert_eq!(input, DashboardInput::File(PathBuf::from("exports/Revenue.dash")));
        assert_eq!(input.key(), "file_Revenue");
        assert_eq!(input.column_label("Revenue"), "Revenue (Revenue)");
    }

    #[test]
    fn test_file_extension_case_insensitive() {
        let input: DashboardInput = "BACKUP.JSON".parse().unwrap();
        assert!(matches!(input, DashboardInput::File(_)));
    }

    #[test]
    fn test_same_id_two_environments_distinct_keys() {
        let a: DashboardInput = "qa:42".parse().unwrap();
        let b: DashboardInput = "prod:42".parse().unwrap();
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_parse_invalid() {
        assert!("justanid".parse::<DashboardInput>().is_err());
        assert!(":42".parse::<DashboardInput>().is_err());
        assert!("qa:".parse::<DashboardInput>().is_err());
    }

    #[test]
    fn test_display() {
        let input: DashboardInput = "qa:42".parse().unwrap();
        assert_eq!(input.to_string(), "42 (qa)");
    }
}
