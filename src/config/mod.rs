//! Configuration management.
//!
//! Settings come from several [`ConfigLayer`]s merged in increasing
//! priority: built-in defaults, the JSON config file, `ARXIV_TRACKER_*`
//! environment variables, command-line flags and finally the answers of
//! the interactive wizard. [`Config::resolve`] is a pure function over the
//! layers; nothing reads the environment after it returns.

mod file_config;
pub mod interactive;

pub use file_config::{load_layer, ENV_PREFIX};
pub use interactive::run_wizard;

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::models::{Criteria, SearchField};
use crate::output::{OutputFormat, DEFAULT_OUTPUT_DIR};
use crate::utils::{write_atomic, DEFAULT_HISTORY_FILE};

/// File the wizard saves to, and the fallback config location
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Papers requested per run unless configured otherwise
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot access config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl ConfigError {
    /// Whether the user aborted an interactive prompt
    pub fn is_interrupted(&self) -> bool {
        match self {
            ConfigError::Prompt(dialoguer::Error::IO(e)) => e.kind() == io::ErrorKind::Interrupted,
            _ => false,
        }
    }
}

/// One partial set of settings; `None` means "not set at this level".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_fields: Option<Vec<SearchField>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_formats: Option<Vec<OutputFormat>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_ssl: Option<bool>,
}

impl ConfigLayer {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(&mut self, other: ConfigLayer) {
        fn overlay<T>(base: &mut Option<T>, top: Option<T>) {
            if top.is_some() {
                *base = top;
            }
        }

        overlay(&mut self.categories, other.categories);
        overlay(&mut self.keywords, other.keywords);
        overlay(&mut self.keyword_fields, other.keyword_fields);
        overlay(&mut self.max_results, other.max_results);
        overlay(&mut self.output_dir, other.output_dir);
        overlay(&mut self.output_formats, other.output_formats);
        overlay(&mut self.history_file, other.history_file);
        overlay(&mut self.silent, other.silent);
        overlay(&mut self.verify_ssl, other.verify_ssl);
    }

    /// Save as pretty JSON, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut content = serde_json::to_string_pretty(self).map_err(|e| io_err(e.into()))?;
        content.push('\n');
        write_atomic(path, content.as_bytes()).map_err(io_err)
    }
}

/// Fully resolved, immutable application configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub keyword_fields: Vec<SearchField>,
    pub max_results: usize,
    pub output_dir: PathBuf,
    pub output_formats: Vec<OutputFormat>,
    pub history_file: PathBuf,
    pub silent: bool,
    pub verify_ssl: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            keywords: Vec::new(),
            keyword_fields: vec![SearchField::All],
            max_results: DEFAULT_MAX_RESULTS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_formats: vec![OutputFormat::Console],
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            silent: false,
            verify_ssl: true,
        }
    }
}

impl Config {
    /// Merge `layers` (lowest priority first) over the defaults and validate.
    pub fn resolve(layers: &[ConfigLayer]) -> Result<Self, ConfigError> {
        let mut merged = ConfigLayer::default();
        for layer in layers {
            merged.merge(layer.clone());
        }

        let defaults = Config::default();
        let config = Config {
            categories: merged.categories.unwrap_or(defaults.categories),
            keywords: merged.keywords.unwrap_or(defaults.keywords),
            keyword_fields: merged.keyword_fields.unwrap_or(defaults.keyword_fields),
            max_results: merged.max_results.unwrap_or(defaults.max_results),
            output_dir: merged.output_dir.unwrap_or(defaults.output_dir),
            output_formats: merged.output_formats.unwrap_or(defaults.output_formats),
            history_file: merged.history_file.unwrap_or(defaults.history_file),
            silent: merged.silent.unwrap_or(defaults.silent),
            verify_ssl: merged.verify_ssl.unwrap_or(defaults.verify_ssl),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_results == 0 {
            return Err(ConfigError::Invalid(
                "max_results must be a positive integer".to_string(),
            ));
        }
        if self.output_formats.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one output format is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether neither categories nor keywords were supplied
    pub fn is_unfiltered(&self) -> bool {
        self.criteria().is_unfiltered()
    }

    /// Search criteria derived from this configuration
    pub fn criteria(&self) -> Criteria {
        Criteria::new(
            self.categories.clone(),
            self.keywords.clone(),
            self.keyword_fields.clone(),
            self.max_results,
        )
    }

    /// The persistable subset the wizard writes back
    pub fn to_layer(&self) -> ConfigLayer {
        ConfigLayer {
            categories: Some(self.categories.clone()),
            keywords: Some(self.keywords.clone()),
            keyword_fields: Some(self.keyword_fields.clone()),
            max_results: Some(self.max_results),
            output_dir: Some(self.output_dir.clone()),
            output_formats: Some(self.output_formats.clone()),
            history_file: Some(self.history_file.clone()),
            silent: Some(self.silent),
            verify_ssl: None,
        }
    }
}
