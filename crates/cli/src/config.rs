use anyhow::{Context, Result};
use engine::{ArrangementSettings, GroupingRule};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::output::Format;

#[cfg(windows)]
pub fn config_dir() -> PathBuf {
    std::env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("arranger")
}

#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".config")
        .join("arranger")
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn default_snap() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ArrangementConfig {
    /// Grouping rules enabled for every run.
    #[serde(default)]
    pub grouping_rules: Vec<GroupingRule>,
    /// Expand entry ranges to whole lines.
    #[serde(default = "default_snap")]
    pub snap_to_lines: bool,
}

impl Default for ArrangementConfig {
    fn default() -> Self {
        Self {
            grouping_rules: Vec::new(),
            snap_to_lines: default_snap(),
        }
    }
}

impl ArrangementConfig {
    /// Configured rules plus the ones given on the command line.
    pub fn settings(&self, extra: &[GroupingRule]) -> ArrangementSettings {
        self.grouping_rules
            .iter()
            .chain(extra)
            .copied()
            .collect()
    }
}

fn default_format() -> Format {
    Format::Text
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: Format,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub arrangement: ArrangementConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

pub fn load_config() -> Result<Config> {
    let path = config_file_path();
    if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_file_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let data = toml::to_string_pretty(config).context("failed to serialize config")?;
    fs::write(&path, data).with_context(|| format!("failed to write {}", path.display()))
}
