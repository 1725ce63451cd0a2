//! Configuration file discovery
//!
//! Settings are layered, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Config file (searched in standard locations)
//! 4. Built-in defaults

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Describes where a configuration was loaded from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Explicit path provided via CLI or env var
    Explicit(PathBuf),
    /// Found in current working directory
    CurrentDir(PathBuf),
    /// Found in XDG config home (~/.config/thermal-skies/)
    XdgConfig(PathBuf),
    /// Found in system config (/etc/thermal-skies/)
    System(PathBuf),
    /// No config file found, using defaults
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Find a configuration file in standard locations
///
/// Search order:
/// 1. Environment variable (`THERMAL_SKIES_CONFIG`)
/// 2. Current directory
/// 3. XDG config home (`$XDG_CONFIG_HOME/thermal-skies/` or `~/.config/thermal-skies/`)
/// 4. System config (`/etc/thermal-skies/`)
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    if let Ok(path) = env::var(env_var) {
        let p = PathBuf::from(&path);
        if p.exists() {
            return ConfigSource::Explicit(p);
        }
        log::warn!("{} points at missing file: {}", env_var, path);
    }

    let candidates = [
        ConfigSource::CurrentDir(PathBuf::from(filename)),
        ConfigSource::XdgConfig(xdg_config_path(filename)),
        ConfigSource::System(PathBuf::from("/etc").join(APP_NAME).join(filename)),
    ];

    candidates
        .into_iter()
        .find(|source| source.path().is_some_and(|p| p.exists()))
        .unwrap_or(ConfigSource::Defaults)
}

fn xdg_config_path(filename: &str) -> PathBuf {
    let base = match (env::var("XDG_CONFIG_HOME"), env::var("HOME")) {
        (Ok(xdg_config), _) => PathBuf::from(xdg_config),
        (Err(_), Ok(home)) => PathBuf::from(home).join(".config"),
        // Won't exist, the lookup simply falls through
        _ => PathBuf::from(".config"),
    };
    base.join(APP_NAME).join(filename)
}

/// Load and parse a TOML configuration file
///
/// Returns `T::default()` when the source is [`ConfigSource::Defaults`].
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    match source.path() {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        None => Ok(T::default()),
    }
}
