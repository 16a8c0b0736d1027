//! Configuration file handling.
//!
//! `config.yaml` is looked up in `/etc/mcli` (Linux) and then in the
//! platform user config dir under `modem-cli/`; the first file found wins.
//! A missing file is not an error, the defaults below apply.

use color_eyre::eyre::{Result, WrapErr as _};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub modem: ModemSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModemSection {
    /// Registered driver name.
    pub model: String,
    /// Device address.
    pub host: String,
    /// Per-command timeout, seconds.
    pub cmd_ttl: u64,
    /// Local interface to dial from.
    pub interface: Option<String>,
}

impl Default for ModemSection {
    fn default() -> Self {
        Self {
            model: "dummy".to_owned(),
            host: "127.0.0.1".to_owned(),
            cmd_ttl: 10,
            interface: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Level for the program itself.
    pub general: String,
    /// Level for driver modules.
    pub driver: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            general: "error".to_owned(),
            driver: "error".to_owned(),
        }
    }
}

pub fn load() -> Result<CliConfig> {
    for dir in search_paths() {
        let path = dir.join("config.yaml");
        match fs::read_to_string(&path) {
            Ok(raw) => {
                return parse(&raw)
                    .wrap_err_with(|| format!("failed to read {}", path.display()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => {
                return Err(err)
                    .wrap_err_with(|| format!("failed to read {}", path.display()))
            }
        }
    }
    Ok(CliConfig::default())
}

fn parse(raw: &str) -> Result<CliConfig> {
    serde_yaml::from_str(raw).wrap_err("malformed configuration")
}

fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if cfg!(target_os = "linux") {
        paths.push(PathBuf::from("/etc/mcli"));
    }
    if let Some(dirs) = directories::BaseDirs::new() {
        paths.push(dirs.config_dir().join("modem-cli"));
    }
    paths
}
