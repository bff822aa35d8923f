// Project configuration loaded from cx.toml
//
// [limits]     overrides TransformLimits fields one by one
// [transform]  default rewrite settings; CLI flags extend them

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::limits::TransformLimits;

pub const DEFAULT_CONFIG_FILE: &str = "cx.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid limit '{name}': {value} (must be positive and reasonable)")]
    InvalidLimit { name: &'static str, value: usize },
}

impl ConfigError {
    pub(crate) fn invalid_limit(name: &'static str, value: usize) -> Self {
        Self::InvalidLimit { name, value }
    }
}

/// Rewrite settings shared by the CLI and the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSettings {
    pub no_pragmas: Vec<String>,
    pub no_quote_includes: bool,
    pub hoist_for_decls: bool,
    pub strip_line_comments: bool,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            no_pragmas: Vec::new(),
            no_quote_includes: false,
            hoist_for_decls: true,
            strip_line_comments: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub limits: TransformLimits,
    pub transform: TransformSettings,
}

impl Config {
    /// Load cx.toml, falling back to defaults.
    ///
    /// Returns error only if the file is unreadable, malformed, or sets an
    /// invalid limit, not if it is missing.
    pub fn from_project_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let project: ProjectConfig = toml::from_str(content).map_err(|source| {
            ConfigError::Parse {
                path: PathBuf::from(DEFAULT_CONFIG_FILE),
                source,
            }
        })?;

        // Merge with defaults (only override specified values)
        let mut config = Self::default();

        if let Some(limits) = project.limits {
            if let Some(v) = limits.max_input_size {
                config.limits.max_input_size = v;
            }
            if let Some(v) = limits.max_token_count {
                config.limits.max_token_count = v;
            }
            if let Some(v) = limits.max_nesting_depth {
                config.limits.max_nesting_depth = v;
            }
        }

        if let Some(transform) = project.transform {
            if let Some(v) = transform.no_pragmas {
                config.transform.no_pragmas = v;
            }
            if let Some(v) = transform.no_quote_includes {
                config.transform.no_quote_includes = v;
            }
            if let Some(v) = transform.hoist_for_decls {
                config.transform.hoist_for_decls = v;
            }
            if let Some(v) = transform.strip_line_comments {
                config.transform.strip_line_comments = v;
            }
        }

        config.limits.validate()?;
        Ok(config)
    }
}

/// TOML configuration structures for deserialization
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectConfig {
    limits: Option<LimitsConfig>,
    transform: Option<TransformConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsConfig {
    max_input_size: Option<usize>,
    max_token_count: Option<usize>,
    max_nesting_depth: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TransformConfig {
    no_pragmas: Option<Vec<String>>,
    no_quote_includes: Option<bool>,
    hoist_for_decls: Option<bool>,
    strip_line_comments: Option<bool>,
}
