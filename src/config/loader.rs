use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::DashcompareConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".dashcompare.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<DashcompareConfig, String> {
    let config = toml::from_str::<DashcompareConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE_NAME}: {e}"))?;

    for (name, env) in &config.environments {
        env.resolve(name).map_err(|e| e.to_string())?;
    }

    if let Some(format) = config.default_format() {
        if !matches!(format, "terminal" | "markdown" | "json") {
            return Err(format!(
                "Unknown output.default_format '{format}' (expected terminal, markdown or json)"
            ));
        }
    }

    Ok(config)
}

/// Load an explicitly requested config file. Any failure is an error.
pub fn load_config_from_path(path: &Path) -> Result<DashcompareConfig> {
    let contents = read_config_file(path).map_err(|e| Error::FileSystemAt {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = parse_and_validate_config(&contents).map_err(Error::Configuration)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try loading config from a discovered path; problems are logged, not raised.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<DashcompareConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // "not found" is the normal case while walking up
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` and its ancestors, nearest first, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest config walking up from `start`, or defaults.
pub fn discover_config(start: PathBuf) -> DashcompareConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            DashcompareConfig::default()
        })
}

/// Load the config for this invocation: the explicit path if given, else discovery from the cwd.
pub fn load_config(explicit: Option<&Path>) -> Result<DashcompareConfig> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }

    match std::env::current_dir() {
        Ok(dir) => Ok(discover_config(dir)),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            Ok(DashcompareConfig::default())
        }
    }
}
