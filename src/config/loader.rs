use std::fs;
use std::path::{Path, PathBuf};

use super::core::DoctransConfig;
use crate::core::errors::{DoctransError, Result};

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".doctrans.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse a TOML configuration document
pub fn parse_config(contents: &str) -> Result<DoctransConfig> {
    toml::from_str::<DoctransConfig>(contents)
        .map_err(|e| DoctransError::Config(format!("Failed to parse {CONFIG_FILE_NAME}: {e}")))
}

/// Read and parse the configuration file at `path`
pub fn read_config(path: &Path) -> Result<DoctransConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        DoctransError::Config(format!("Failed to read {}: {e}", path.display()))
    })?;
    parse_config(&contents)
}

fn try_load_config_from_path(config_path: &Path) -> Option<DoctransConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {}", config_path.display(), e);
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            Some(DoctransConfig::default())
        }
    }
}

/// Directory ancestors of `start`, itself included, up to `max_depth` entries
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

/// Configuration from an explicit path, else from the nearest
/// `.doctrans.toml`, else the defaults.
///
/// Unreadable or invalid files log a warning and fall back to defaults.
pub fn load_config(explicit: Option<&Path>) -> DoctransConfig {
    if let Some(path) = explicit {
        return match read_config(path) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}. Using defaults.", e);
                DoctransConfig::default()
            }
        };
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Failed to get current directory: {}. Using default config.", e);
            return DoctransConfig::default();
        }
    };
    load_config_from(current)
}

/// Search `start` and its ancestors for `.doctrans.toml`
pub fn load_config_from(start: PathBuf) -> DoctransConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            DoctransConfig::default()
        })
}
