use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::model::iteration::IterationPolicy;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Program used for every GitHub call.
    pub gh_path: String,
    pub build_label_prefix: String,
    /// Accepted names for the project's iteration field, in priority of field order.
    pub iteration_fields: Vec<String>,
    pub iteration_policy: IterationPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gh_path: "gh".into(),
            build_label_prefix: "B".into(),
            iteration_fields: vec!["Iteration".into(), "Sprint".into()],
            iteration_policy: IterationPolicy::First,
        }
    }
}

impl AppConfig {
    fn validate(&self) -> Result<()> {
        if self.gh_path.trim().is_empty() {
            bail!("gh_path cannot be empty");
        }
        if self.build_label_prefix.is_empty() {
            bail!("build_label_prefix cannot be empty");
        }
        if self.iteration_fields.is_empty() {
            bail!("iteration_fields needs at least one field name");
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("buildboard")
        .join("config.toml")
}

/// Load the config file. The default location may be absent; a path the
/// user named explicitly must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let path = default_config_path();
            if !path.exists() {
                return Ok(AppConfig::default());
            }
            path
        }
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}
