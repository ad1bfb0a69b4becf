//! Organizer options and file filtering rules loaded from TOML.
//!
//! Configuration is looked up in this order:
//! 1. The path passed with `--config`
//! 2. `.tidymetarc.toml` in the current directory
//! 3. `~/.config/tidymeta/config.toml`
//! 4. Built-in defaults (every regular file is organized)
//!
//! # Configuration File Format
//!
//! ```toml
//! [organizer]
//! skip_duplicates = false
//! sniff_content = false
//! log_dir = "."
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["tmp"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```

use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG_NAME: &str = ".tidymetarc.toml";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// An explicitly named configuration file does not exist.
    ConfigNotFound(PathBuf),
    /// The file is not valid TOML or has the wrong shape.
    ConfigInvalid(String),
    /// A filter glob does not compile.
    InvalidGlobPattern(String),
    /// A filter regex does not compile.
    InvalidRegexPattern { pattern: String, reason: String },
    /// The file exists but could not be read.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Full configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub organizer: OrganizerOptions,
    pub filters: FilterRules,
}

/// Behavior switches for the organizer loop.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrganizerOptions {
    /// Leave files whose content was already seen earlier in the run in place.
    pub skip_duplicates: bool,
    /// Infer a type from file content when a file has no extension.
    pub sniff_content: bool,
    /// Directory for the per-run log file. Defaults to the current directory.
    pub log_dir: Option<PathBuf>,
}

/// Which directory entries are considered for organizing.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterRules {
    /// Whether to organize hidden files (starting with "."). Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist; a match overrides every exclude rule.
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRules {
    #[serde(default)]
    pub filenames: Vec<String>,
    /// Glob patterns matched against the file name.
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub regex: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl AppConfig {
    /// Loads configuration, falling back to defaults when no file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file is missing, or if any file
    /// that is found cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_source(config_path).map(|(config, _)| config)
    }

    /// Like [`AppConfig::load`], also returning the file that was read.
    ///
    /// The source is `None` when no file was found and defaults are in use.
    pub fn load_with_source(
        config_path: Option<&Path>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match Self::locate(config_path) {
            Some(path) => Ok((Self::load_from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// The file `load` would read, if any.
    fn locate(config_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = config_path {
            return Some(path.to_path_buf());
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_NAME);
        if local_config.exists() {
            return Some(local_config);
        }

        let home = std::env::var("HOME").ok()?;
        let home_config = PathBuf::from(home)
            .join(".config")
            .join("tidymeta")
            .join("config.toml");
        home_config.exists().then_some(home_config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }
}

impl FilterRules {
    /// Validates and pre-compiles every pattern.
    pub fn compile(&self) -> Result<CompiledFilters, ConfigError> {
        let exclude_regexes = self
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

        Ok(CompiledFilters {
            enable_hidden_files: self.enable_hidden_files,
            exclude_filenames: self.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: self
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns: compile_globs(&self.exclude.patterns)?,
            exclude_regexes,
            include_patterns: compile_globs(&self.include.patterns)?,
        })
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(|_| ConfigError::InvalidGlobPattern(p.clone())))
        .collect()
}

/// Pre-compiled filter rules.
///
/// The organizer only looks at immediate entries of one folder, so every rule
/// is matched against the entry's file name.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl Default for CompiledFilters {
    /// Accepts every file.
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

impl CompiledFilters {
    /// Whether the file should be organized.
    ///
    /// Include patterns win; otherwise hidden files, exact names, extensions,
    /// globs and regexes exclude in that order.
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.include_patterns.iter().any(|p| p.matches(&file_name)) {
            return true;
        }
        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }
        if self.exclude_filenames.contains(&*file_name) {
            return false;
        }
        if let Some(ext) = file_path.extension() {
            if self
                .exclude_extensions
                .contains(&ext.to_string_lossy().to_lowercase())
            {
                return false;
            }
        }
        if self.exclude_patterns.iter().any(|p| p.matches(&file_name)) {
            return false;
        }
        !self.exclude_regexes.iter().any(|r| r.is_match(&file_name))
    }
}
