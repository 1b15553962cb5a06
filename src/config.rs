//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.gradewalk.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Platform API settings.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Run settings.
    #[serde(default)]
    pub run: RunConfig,

    /// Loosely-typed per-analyzer option tables, e.g.
    /// `[analyzers."comments.counter"]`. Values are validated by the
    /// analyzer they are handed to.
    #[serde(default)]
    pub analyzers: BTreeMap<String, serde_json::Map<String, serde_json::Value>>,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Grading-platform API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.codepost.io".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Settings for what one run covers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// Course name on the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,

    /// Enrollment period, e.g. "S2026".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,

    /// Restrict the run to these assignment names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Vec<String>>,

    /// Built-in analyzers to register (all of them when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzers: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".gradewalk.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref course) = args.course {
            self.run.course = Some(course.clone());
        }
        if let Some(ref period) = args.period {
            self.run.period = Some(period.clone());
        }
        if let Some(ref assignments) = args.assignments {
            self.run.assignments = Some(assignments.clone());
        }
        if let Some(ref analyzers) = args.analyzers {
            self.run.analyzers = Some(analyzers.clone());
        }

        if let Some(ref api_url) = args.api_url {
            self.platform.api_url = api_url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.platform.timeout_seconds = timeout;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
