//! CLI configuration utilities

use agendify_frontend_common::ConsoleConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load the console configuration; `data_dir` from the command line wins
pub fn load(path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<ConsoleConfig> {
    let mut config = ConsoleConfig::load(path).with_context(|| match path {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }
    Ok(config)
}

/// Save configuration to a JSON file
pub fn save_config<P: AsRef<Path>>(config: &ConsoleConfig, path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Generate a default configuration file
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    save_config(&ConsoleConfig::default(), path)
}
