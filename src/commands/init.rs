use crate::config::{DoctransConfig, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let contents = toml::to_string_pretty(&DoctransConfig::default())
        .context("Failed to serialize default configuration")?;
    std::fs::write(&config_path, format!("# doctrans configuration\n\n{contents}"))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}
