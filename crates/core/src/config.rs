//! Config file discovery and TOML loading. CLI flags and env vars are
//! merged over the file by the service.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// `--config` flag or the config env var
    Explicit(PathBuf),
    CurrentDir(PathBuf),
    XdgConfig(PathBuf),
    System(PathBuf),
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

/// First existing config file: `$env_var`, then `./filename`, the XDG
/// config dir, and `/etc/climate-api/`.
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    if let Some(path) = env::var_os(env_var).map(PathBuf::from) {
        if path.exists() {
            return ConfigSource::Explicit(path);
        }
        debug!("{} points at missing file {}, ignoring", env_var, path.display());
    }

    let candidates: [(fn(PathBuf) -> ConfigSource, PathBuf); 3] = [
        (ConfigSource::CurrentDir, PathBuf::from(filename)),
        (ConfigSource::XdgConfig, get_xdg_config_path(filename)),
        (
            ConfigSource::System,
            Path::new("/etc").join(APP_NAME).join(filename),
        ),
    ];

    candidates
        .into_iter()
        .find(|(_, path)| path.exists())
        .map_or(ConfigSource::Defaults, |(source, path)| source(path))
}

pub fn get_xdg_config_path(filename: &str) -> PathBuf {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(APP_NAME)
        .join(filename)
}

/// `T::default()` for [`ConfigSource::Defaults`], otherwise the parsed file.
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    let Some(path) = source.path() else {
        return Ok(T::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
