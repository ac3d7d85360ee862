use anyhow::Result;
use std::path::Path;

use wordpulse::config::Config;

/// Print the effective configuration as TOML
pub fn show_config(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("# Effective wordpulse configuration");
    if let Some(path) = config_path {
        println!("# Loaded from {}", path.display());
    }
    println!("{}", config.to_toml()?);

    Ok(())
}
