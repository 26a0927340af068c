//! Configuration file handling
//!
//! Settings come from an optional TOML file, then command-line overrides:
//!
//! ```toml
//! [watch]
//! extensions = ["jpg", "jpeg"]
//! exclude = ["thumb_*"]
//!
//! [ocr]
//! command = "tesseract"
//! language = "eng"
//! extra_args = ["--psm", "1"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use watcher::filter::normalize_extension;
use watcher::FilterConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("watch.extensions must list at least one extension")]
    NoExtensions,

    #[error("ocr.command must not be empty")]
    EmptyOcrCommand,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which files in the inbox are picked up
    pub watch: FilterConfig,

    /// How picked up files are turned into PDFs
    pub ocr: OcrConfig,
}

/// OCR command settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Executable invoked as `<command> <image> <output_base> [-l <language>] [extra_args] pdf`
    #[serde(default = "default_ocr_command")]
    pub command: String,

    /// Value for `-l`, if any
    #[serde(default)]
    pub language: Option<String>,

    /// Passed through before the final `pdf` argument
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: default_ocr_command(),
            language: None,
            extra_args: vec![],
        }
    }
}

fn default_ocr_command() -> String {
    "tesseract".to_string()
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub extensions: Vec<String>,
    pub ocr_command: Option<String>,
}

impl Config {
    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text).context("Invalid configuration file")?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides, then re-validate
    pub fn apply(&mut self, overrides: Overrides) -> Result<()> {
        if !overrides.extensions.is_empty() {
            self.watch.extensions = overrides.extensions;
        }
        if let Some(command) = overrides.ocr_command {
            self.ocr.command = command;
        }
        self.normalize();
        self.validate()?;
        Ok(())
    }

    /// Normalise extensions, keeping the first spelling of each
    fn normalize(&mut self) {
        let mut extensions: Vec<String> = Vec::with_capacity(self.watch.extensions.len());
        for ext in self.watch.extensions.iter().map(|ext| normalize_extension(ext)) {
            if !ext.is_empty() && !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        self.watch.extensions = extensions;
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.watch.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        if self.ocr.command.trim().is_empty() {
            return Err(ConfigError::EmptyOcrCommand);
        }
        Ok(())
    }
}

/// Default config location: `<config_dir>/autoscan/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("autoscan").join("config.toml"))
}

/// Load configuration
///
/// An explicit path must exist. Without one, the default location is used
/// if present, otherwise built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_file_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    Config::from_toml(&text).with_context(|| format!("Failed to load {}", path.display()))
}
