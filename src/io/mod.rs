pub mod output;

pub use output::{create_writer, ComparisonReport, OutputFormat, OutputWriter};

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Stdout, or a freshly created file when `path` is given.
pub fn open_destination(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_destination_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        {
            let mut out = open_destination(Some(&path)).unwrap();
            write!(out, "hello").unwrap();
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_file_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_file(&dir.path().join("nope/x.toml"), "x").unwrap_err();
        assert!(err.to_string().contains("Failed to write"));
    }
}
