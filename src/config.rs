//! File filtering configuration.
//!
//! By default every top-level regular file is organized. A TOML configuration
//! file can narrow that down:
//! - Exact filename matching
//! - Glob pattern matching on the file name
//! - File extension matching
//! - Regex pattern matching
//! - Include (whitelist) rules that override exclude rules
//!
//! # Configuration File Format
//!
//! ```toml
//! [filters]
//! skip_hidden = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.tmp"]
//! extensions = ["bak", "part"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".dirsortrc.toml";

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    #[error("IO error reading configuration: {0}")]
    Io(String),
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filters: FilterRules,
}

/// Filter rules applied to every candidate file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Skip names starting with ".". Off by default.
    #[serde(default)]
    pub skip_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist, overrides every exclusion.
    #[serde(default)]
    pub include: IncludeRules,
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names, e.g. ".DS_Store".
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name, e.g. "*.tmp".
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions without the dot, compared case-insensitively.
    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub regex: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FilterConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (must exist)
    /// 2. `.dirsortrc.toml` in the current directory
    /// 3. `~/.config/dirsort/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_source(config_path).map(|(config, _)| config)
    }

    /// Like [`FilterConfig::load`], also returning the file that was read.
    pub fn load_with_source(
        config_path: Option<&Path>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::locate(config_path) {
            Some(path) => Ok((Self::load_from_file(&path)?, Some(path))),
            None => {
                tracing::debug!("no configuration file found, using defaults");
                Ok((Self::default(), None))
            }
        }
    }

    /// The configuration file that [`FilterConfig::load`] would read.
    pub fn locate(config_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = config_path {
            return Some(path.to_path_buf());
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.is_file() {
            return Some(local_config);
        }

        let home_config = PathBuf::from(std::env::var_os("HOME")?)
            .join(".config")
            .join("dirsort")
            .join("config.toml");
        home_config.is_file().then_some(home_config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Compile into matchers. Fails on any invalid glob or regex.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.filters)
    }
}

/// Pre-compiled filter rules.
#[derive(Debug)]
pub struct CompiledFilters {
    skip_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden: rules.skip_hidden,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Filters that let every file through.
    pub fn allow_all() -> Self {
        Self {
            skip_hidden: false,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }

    /// Check whether a file name should be organized.
    ///
    /// Checks run in this order, stopping at the first decision:
    /// 1. Include patterns - if matched, include
    /// 2. Hidden file filter
    /// 3. Exact filename
    /// 4. Extension
    /// 5. Glob patterns
    /// 6. Regex patterns
    /// 7. Default: include
    pub fn should_include(&self, file_name: &str) -> bool {
        if self.include_patterns.iter().any(|p| p.matches(file_name)) {
            return true;
        }

        if self.skip_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        if let Some(ext) = Path::new(file_name).extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.exclude_patterns.iter().any(|p| p.matches(file_name)) {
            return false;
        }

        if self.exclude_regexes.iter().any(|r| r.is_match(file_name)) {
            return false;
        }

        true
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self::allow_all()
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}
