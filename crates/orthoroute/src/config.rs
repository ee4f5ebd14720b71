use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use orthoroute::{RouteOptions, Size};

use crate::cli::OutputFormat;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "orthoroute";
const MARGIN_PATTERN: &str = r"^(\d+)(?:x(\d+))?$";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Shape clearance for scenes that do not set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<MarginSetting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
}

/// A margin as written in the config file: `10` or `"12x8"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarginSetting {
    Uniform(u32),
    Text(String),
}

impl MarginSetting {
    pub fn to_size(&self) -> Result<Size> {
        match self {
            Self::Uniform(n) => parse_margin(&n.to_string()),
            Self::Text(s) => parse_margin(s),
        }
    }
}

impl std::fmt::Display for MarginSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uniform(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Parse `N` (square) or `WxH` into a margin of at least one unit per axis.
pub fn parse_margin(value: &str) -> Result<Size> {
    let re = Regex::new(MARGIN_PATTERN)?;
    let caps = re
        .captures(value.trim())
        .ok_or_else(|| anyhow::anyhow!("Invalid margin: {value}. Use a number like 10 or 12x8."))?;
    let width: i32 = caps[1]
        .parse()
        .with_context(|| format!("Margin out of range: {value}"))?;
    let height: i32 = match caps.get(2) {
        Some(h) => h
            .as_str()
            .parse()
            .with_context(|| format!("Margin out of range: {value}"))?,
        None => width,
    };
    if width < 1 || height < 1 {
        anyhow::bail!("Invalid margin: {value}. Both components must be at least 1.");
    }
    Ok(Size::new(width, height))
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `orthoroute config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents =
            format!("# orthoroute configuration - https://github.com/mklab-se/orthoroute\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.margin" => {
                parse_margin(value)?;
                let setting = match value.trim().parse::<u32>() {
                    Ok(n) => MarginSetting::Uniform(n),
                    Err(_) => MarginSetting::Text(value.trim().to_string()),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .margin = Some(setting);
            }
            "defaults.format" => {
                match value {
                    "text" | "json" => {}
                    _ => anyhow::bail!("Invalid format: {value}. Must be 'text' or 'json'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .format = Some(value.to_string());
            }
            "defaults.max_iterations" => {
                let n = value.parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(|| {
                    anyhow::anyhow!("Invalid max_iterations: {value}. Must be a positive number.")
                })?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .max_iterations = Some(n);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.margin, defaults.format, defaults.max_iterations"
            ),
        }
        Ok(())
    }

    /// Configured shape clearance, if any.
    pub fn margin(&self) -> Result<Option<Size>> {
        self.defaults
            .as_ref()
            .and_then(|d| d.margin.as_ref())
            .map(MarginSetting::to_size)
            .transpose()
    }

    pub fn format(&self) -> OutputFormat {
        match self.defaults.as_ref().and_then(|d| d.format.as_deref()) {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }

    /// Router options with the configured step budget.
    pub fn route_options(&self) -> RouteOptions {
        let defaults = RouteOptions::default();
        RouteOptions {
            max_iterations: self
                .defaults
                .as_ref()
                .and_then(|d| d.max_iterations)
                .unwrap_or(defaults.max_iterations),
            ..defaults
        }
    }
}
