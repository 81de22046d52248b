// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::core::ProbeConfig;
use super::validation::ConfigValidator;

pub const ENV_PROXY: &str = "GQLMS_PROXY";
pub const ENV_DELAY: &str = "GQLMS_DELAY";
pub const ENV_TIMEOUT: &str = "GQLMS_TIMEOUT";

pub struct ConfigLoader {
    config_path: PathBuf,
    format: ConfigFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref().to_path_buf();
        let format = Self::detect_format(&path)?;

        Ok(Self {
            config_path: path,
            format,
        })
    }

    fn detect_format(path: &Path) -> Result<ConfigFormat> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| anyhow::anyhow!("Could not determine config file format"))?;

        match extension {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(anyhow::anyhow!("Unsupported config file format: {}", extension)),
        }
    }

    /// File contents layered over defaults, without environment overrides
    pub fn load_file(&self) -> Result<ProbeConfig> {
        let content = std::fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file: {:?}", self.config_path))?;

        let config: ProbeConfig = match self.format {
            ConfigFormat::Yaml => {
                serde_yaml::from_str(&content).context("Failed to parse YAML config")?
            }
            ConfigFormat::Toml => toml::from_str(&content).context("Failed to parse TOML config")?,
            ConfigFormat::Json => {
                serde_json::from_str(&content).context("Failed to parse JSON config")?
            }
        };

        debug!("Loaded configuration from {:?}", self.config_path);
        Ok(config)
    }

    pub fn load_config(&self) -> Result<ProbeConfig> {
        let mut config = self.load_file()?;
        apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}

/// Defaults, then the optional file, then the environment
pub fn load_config(config_path: Option<&Path>) -> Result<ProbeConfig> {
    match config_path {
        Some(path) => ConfigLoader::new(path)?.load_config(),
        None => {
            let mut config = ProbeConfig::default();
            apply_env_overrides(&mut config)?;
            ConfigValidator::validate(&config)?;
            Ok(config)
        }
    }
}

pub fn apply_env_overrides(config: &mut ProbeConfig) -> Result<()> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

pub(crate) fn apply_overrides_from<F>(config: &mut ProbeConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(proxy) = lookup(ENV_PROXY).filter(|p| !p.is_empty()) {
        config.proxy = Some(proxy);
    }

    if let Some(delay) = lookup(ENV_DELAY) {
        config.delay_secs = delay
            .parse()
            .with_context(|| format!("Invalid {}", ENV_DELAY))?;
    }

    if let Some(timeout) = lookup(ENV_TIMEOUT) {
        config.request_timeout_secs = timeout
            .parse()
            .with_context(|| format!("Invalid {}", ENV_TIMEOUT))?;
    }

    Ok(())
}
