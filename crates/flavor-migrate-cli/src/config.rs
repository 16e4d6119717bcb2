//! Run configuration: template library location and output path.
//!
//! Precedence is CLI flag, then config file, then built-in default.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TEMPLATE_DIR: &str = "/opt/hvs-flavortemplates";
pub const DEFAULT_OUTPUT_PATH: &str = "/opt/newflavorpart.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrateConfig {
    pub template_dir: PathBuf,
    pub output_path: PathBuf,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl MigrateConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.display().to_string(),
            source,
        })
    }

    /// Config file (if any) with flag overrides applied.
    pub fn resolve(
        config_path: Option<&Path>,
        template_dir: Option<PathBuf>,
        output_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(dir) = template_dir {
            config.template_dir = dir;
        }
        if let Some(path) = output_path {
            config.output_path = path;
        }
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
