//! Admission filter for tracked paths
//!
//! Decides whether a create/open event is worth tracking at all:
//! 1. The file extension must be in the accepted set (case-insensitive)
//! 2. The path must not match any configured exclude pattern

use crate::error::{Result, WatchError};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pure predicate over paths
///
/// Called once per create/open event. Must not fail; a path it cannot
/// classify is simply not accepted.
pub trait PathFilter {
    fn accepts(&self, path: &Path) -> bool;
}

impl<F> PathFilter for F
where
    F: Fn(&Path) -> bool,
{
    fn accepts(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Filter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Accepted extensions, without the leading dot (default: jpg, jpeg)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Gitignore-style patterns for files to skip even if the extension matches
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: vec![],
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string()]
}

/// Lowercase an extension and drop any leading dot
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Extension based filter with optional exclude patterns
#[derive(Debug)]
pub struct ExtensionFilter {
    /// Normalized accepted extensions
    extensions: Vec<String>,

    /// Exclude patterns, rooted at the watched directory
    exclude: Option<Gitignore>,
}

impl ExtensionFilter {
    /// Build a filter for files under `root`
    pub fn new(root: &Path, config: &FilterConfig) -> Result<Self> {
        let extensions = config
            .extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .filter(|ext| !ext.is_empty())
            .collect();

        let exclude = if config.exclude.is_empty() {
            None
        } else {
            let mut builder = GitignoreBuilder::new(root);
            for pattern in &config.exclude {
                builder
                    .add_line(None, pattern)
                    .map_err(|source| WatchError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })?;
            }
            let gitignore = builder.build().map_err(|source| WatchError::InvalidPattern {
                pattern: config.exclude.join(", "),
                source,
            })?;
            Some(gitignore)
        };

        Ok(Self { extensions, exclude })
    }

    /// The default JPEG filter
    pub fn jpeg() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: None,
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn has_accepted_extension(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext = ext.to_string_lossy().to_lowercase();
                self.extensions.iter().any(|accepted| *accepted == ext)
            }
            None => false,
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        match self.exclude {
            Some(ref exclude) => exclude.matched(path, false).is_ignore(),
            None => false,
        }
    }
}

impl PathFilter for ExtensionFilter {
    fn accepts(&self, path: &Path) -> bool {
        self.has_accepted_extension(path) && !self.is_excluded(path)
    }
}
