//! Implementation of the `sdlc config` command.

use crate::config::Config;
use crate::error::Result;

/// Print the effective configuration as YAML.
pub fn cmd_config(config: &Config) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}
