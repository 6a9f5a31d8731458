//! Config command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::cli::ConfigAction;
use crate::config::Config;
use crate::util::write_output;

pub fn cmd_config(
    action: &ConfigAction,
    path: &Path,
    config: &Config,
    output: Option<&PathBuf>,
) -> Result<()> {
    match action {
        ConfigAction::Path => write_output(output, &format!("{}\n", path.display())),
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config)?;
            write_output(output, &content)
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(path)?;
            write_output(output, &format!("Wrote {}\n", path.display()))
        }
        ConfigAction::Validate => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            let config = Config::read(path)?;
            let problems = config.validate();
            if !problems.is_empty() {
                let list: Vec<String> = problems.iter().map(|p| format!("  - {p}")).collect();
                bail!("Invalid configuration {}:\n{}", path.display(), list.join("\n"));
            }
            write_output(
                output,
                &format!(
                    "{} is valid ({} location(s))\n",
                    path.display(),
                    config.locations.len()
                ),
            )
        }
    }
}
