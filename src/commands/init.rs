use crate::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG};
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    write_default_config(&config_path, force)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");
    Ok(())
}

pub fn write_default_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }
    io::write_file(config_path, DEFAULT_CONFIG)
}
