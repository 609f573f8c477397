use crate::OutputFormat;
use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use video_capabilities::DynamicRange;

pub const CONFIG_ENV_VAR: &str = "VIDEO_CAPABILITIES_CONFIG";
const CONFIG_DIR_NAME: &str = "video-capabilities";
const CONFIG_FILE_NAME: &str = "video-capabilities.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub device_file: Option<PathBuf>,
    pub dynamic_range: Option<DynamicRange>,
    pub output: Option<OutputFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli(PathBuf),
    Env(PathBuf),
    Default(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Cli(path) | ConfigSource::Env(path) | ConfigSource::Default(path) => {
                path
            }
        }
    }
}

/// Finds and parses the configuration file.
///
/// An explicit `path_override` must exist. Otherwise `VIDEO_CAPABILITIES_CONFIG`
/// and then the default locations are tried; finding nothing is not an error.
pub fn load(path_override: Option<&Path>) -> Result<Option<(Config, ConfigSource)>> {
    if let Some(path) = path_override {
        if !path.exists() {
            bail!("Configuration file '{}' does not exist", path.display());
        }
        let config = parse_file(path)?;
        return Ok(Some((config, ConfigSource::Cli(path.to_path_buf()))));
    }

    if let Some(env_path) = env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            let config = parse_file(&path)?;
            return Ok(Some((config, ConfigSource::Env(path))));
        }
        debug!(
            "{} points at missing file '{}'; ignoring",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    for candidate in default_config_candidates() {
        if !candidate.exists() {
            continue;
        }
        let config = parse_file(&candidate)?;
        return Ok(Some((config, ConfigSource::Default(candidate))));
    }

    Ok(None)
}

fn parse_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file at {}", path.display()))?;
    let mut config: Config = toml::from_str(&contents)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    // Relative device paths are taken relative to the config file.
    if let (Some(device_file), Some(parent)) = (config.device_file.as_ref(), path.parent()) {
        if device_file.is_relative() {
            config.device_file = Some(parent.join(device_file));
        }
    }

    Ok(config)
}

fn default_config_candidates() -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();

    let mut push_unique = |path: PathBuf, out: &mut Vec<PathBuf>| {
        if !path.as_os_str().is_empty() && seen.insert(path.clone()) {
            out.push(path);
        }
    };

    if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME").filter(|val| !val.is_empty()) {
        let mut path = PathBuf::from(xdg_config);
        path.push(CONFIG_DIR_NAME);
        path.push("config.toml");
        push_unique(path, &mut out);
    }

    if let Some(home) = env::var_os("HOME").filter(|val| !val.is_empty()) {
        let home = PathBuf::from(home);
        let mut path = home.join(".config");
        path.push(CONFIG_DIR_NAME);
        path.push("config.toml");
        push_unique(path, &mut out);

        push_unique(home.join(CONFIG_FILE_NAME), &mut out);
    }

    if let Ok(current_dir) = env::current_dir() {
        push_unique(current_dir.join(CONFIG_FILE_NAME), &mut out);
    }

    out
}
