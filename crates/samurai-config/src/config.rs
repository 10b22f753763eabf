//! Configuration management for samurai

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use samurai_foundation::paths::normalize_path;
use samurai_foundation::{QuoteStyle, SamuraiError, SamuraiResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names probed (in order) when no explicit config file is given
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["samurai.toml", ".samurai/config.toml"];

/// Prefix of environment variable overrides, e.g. `SAMURAI__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "SAMURAI__";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Library layout and module discovery
    pub library: LibraryConfig,
    /// Rewrite behaviour
    pub rewrite: RewriteConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Library layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Library root; discovered from angular.json when absent
    pub root: Option<PathBuf>,
    /// Angular project to take the library root from
    pub project: Option<String>,
    /// Prefix of public entry points; defaults to the library's package name
    pub public_prefix: Option<String>,
    /// Regex matched against file names to find module markers
    pub marker_pattern: String,
    /// Regex for file names that look like markers but never are
    pub ignored_marker_pattern: Option<String>,
    /// Extensions (without dot) of the source files to rewrite
    pub extensions: Vec<String>,
    /// Directory names skipped while enumerating the library
    pub exclude: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: None,
            project: None,
            public_prefix: None,
            marker_pattern: r"\.module\.ts$".to_string(),
            ignored_marker_pattern: Some(r"-routing\.module\.ts$".to_string()),
            extensions: vec!["ts".to_string()],
            exclude: vec!["node_modules".to_string()],
        }
    }
}

/// What to do when a single file cannot be processed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort the run at the first error
    #[default]
    FailFast,
    /// Record per-file errors and keep going
    Collect,
}

/// Rewrite configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Quote character of rewritten literals
    pub quote_style: QuoteStyle,
    /// Also rewrite `export … from` declarations
    pub include_reexports: bool,
    pub error_policy: ErrorPolicy,
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format for CI
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration for the current working directory
    pub fn load() -> SamuraiResult<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_from(&cwd, None)
    }

    /// Load configuration from files and environment
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (SAMURAI__*)
    /// 2. `explicit_file`, or the first of `CONFIG_FILE_CANDIDATES` found in `base_dir`
    /// 3. Default values
    pub fn load_from(base_dir: &Path, explicit_file: Option<&Path>) -> SamuraiResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        match explicit_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(SamuraiError::config(format!(
                        "Configuration file {} does not exist",
                        path.display()
                    )));
                }
                tracing::info!(path = %path.display(), "Loading TOML configuration");
                figment = figment.merge(Toml::file(path));
            }
            None => {
                for candidate in CONFIG_FILE_CANDIDATES {
                    let path = base_dir.join(candidate);
                    if path.is_file() {
                        tracing::info!(path = %path.display(), "Loading TOML configuration");
                        figment = figment.merge(Toml::file(path));
                        break; // Use first found TOML file
                    }
                }
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: AppConfig = figment
            .extract()
            .map_err(|e| SamuraiError::config(format!("Failed to load configuration: {}", e)))?;

        // Relative roots in a config file are relative to the directory it was loaded for
        if let Some(root) = config.library.root.take() {
            config.library.root = Some(normalize_path(&base_dir.join(root)));
        }

        config.validate()?;

        tracing::debug!(
            root = ?config.library.root,
            prefix = ?config.library.public_prefix,
            policy = ?config.rewrite.error_policy,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> SamuraiResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SamuraiError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        Regex::new(&self.library.marker_pattern).map_err(|e| {
            SamuraiError::config(format!(
                "Invalid marker pattern '{}': {}",
                self.library.marker_pattern, e
            ))
        })?;

        if let Some(pattern) = &self.library.ignored_marker_pattern {
            Regex::new(pattern).map_err(|e| {
                SamuraiError::config(format!(
                    "Invalid ignored marker pattern '{}': {}",
                    pattern, e
                ))
            })?;
        }

        if self.library.extensions.is_empty() {
            return Err(SamuraiError::config(
                "At least one source file extension must be configured",
            ));
        }

        if let Some(prefix) = &self.library.public_prefix {
            if prefix.is_empty() || prefix.ends_with('/') {
                return Err(SamuraiError::config(format!(
                    "Public prefix '{}' must be non-empty and must not end with '/'",
                    prefix
                )));
            }
        }

        Ok(())
    }
}
