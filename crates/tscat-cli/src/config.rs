//! `tscat.toml` configuration.
//!
//! ```toml
//! [merge]
//! drop_vanished = true
//!
//! [output]
//! format_version = "2.1"
//! source_language = "en_US"
//!
//! [lookup]
//! locale_dir = "i18n"
//! file_pattern = "base_{locale}.ts"
//! ```
//!
//! Every field is optional; `TscatConfig::default()` matches running without
//! a config file. Command-line flags override configured values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tscat_core::FormatVersion;

use crate::error::{CliError, Result};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tscat.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TscatConfig {
    pub merge: MergeConfig,
    pub output: OutputConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Prune vanished messages right after every merge. Default: false.
    pub drop_vanished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Version stamped on written catalogs. Default: "2.1".
    pub format_version: String,
    /// Source locale recorded on catalogs that do not name one.
    pub source_language: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format_version: FormatVersion::CURRENT.to_string(),
            source_language: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Directory holding one catalog per locale. Default: ".".
    pub locale_dir: PathBuf,
    /// File name template; `{locale}` is replaced by the locale tag.
    pub file_pattern: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            locale_dir: PathBuf::from("."),
            file_pattern: "{locale}.ts".to_string(),
        }
    }
}

impl TscatConfig {
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        Self::from_toml_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit`, or `tscat.toml` in the working directory if present,
    /// or the defaults; then validate.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_toml_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_toml_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        let problems = config.validate();
        if !problems.is_empty() {
            return Err(CliError::InvalidConfig { problems });
        }
        tracing::debug!(target: "tscat.config", ?config, "configuration loaded");
        Ok(config)
    }

    /// Validate all values. Returns a list of problems (empty = valid).
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match self.output.format_version.parse::<FormatVersion>() {
            Ok(version) if version.is_newer_than_supported() => errors.push(format!(
                "output.format_version {version} is newer than supported {}",
                FormatVersion::CURRENT
            )),
            Ok(_) => {}
            Err(err) => errors.push(format!("output.format_version: {err}")),
        }

        if self
            .output
            .source_language
            .as_deref()
            .is_some_and(|tag| tag.trim().is_empty())
        {
            errors.push("output.source_language must not be blank".into());
        }

        if !self.lookup.file_pattern.contains("{locale}") {
            errors.push(format!(
                "lookup.file_pattern must contain {{locale}}, got {:?}",
                self.lookup.file_pattern
            ));
        }

        errors
    }

    /// The configured output version. Only meaningful after [`Self::validate`].
    #[must_use]
    pub fn format_version(&self) -> FormatVersion {
        self.output
            .format_version
            .parse()
            .unwrap_or(FormatVersion::CURRENT)
    }
}
