//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Gradewalk - grading-activity statistics for codePost-style platforms
///
/// Walk a course's assignments, submissions, and comments, feed every
/// record to a set of counting analyzers, and render the per-grader
/// totals as a Markdown or JSON report.
///
/// Examples:
///   gradewalk --course COS126 --period S2026
///   gradewalk --course COS126 --period S2026 --assignments hw01,hw02
///   gradewalk --course COS126 --period S2026 --format json -o stats.json
///   gradewalk --list-analyzers
///   gradewalk --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Course name on the platform
    ///
    /// Required unless --init-config or --list-analyzers is used, or the
    /// course is set in .gradewalk.toml.
    #[arg(short, long, value_name = "NAME")]
    pub course: Option<String>,

    /// Enrollment period of the course (e.g. S2026)
    #[arg(short, long, value_name = "PERIOD")]
    pub period: Option<String>,

    /// Platform API key
    ///
    /// Can also be set via the GRADEWALK_API_KEY env var.
    #[arg(short = 'k', long, env = "GRADEWALK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Platform API base URL
    #[arg(long, value_name = "URL", env = "GRADEWALK_API_URL")]
    pub api_url: Option<String>,

    /// Restrict the run to these assignment names (comma-separated)
    ///
    /// Example: --assignments hw01,hw02
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub assignments: Option<Vec<String>>,

    /// Analyzers to run (comma-separated; all built-ins by default)
    ///
    /// See --list-analyzers for the available names.
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub analyzers: Option<Vec<String>>,

    /// Output file path for the report
    #[arg(
        short,
        long,
        default_value = "gradewalk_report.md",
        value_name = "FILE"
    )]
    pub output: PathBuf,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .gradewalk.toml in the current directory
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// List the built-in analyzers and exit
    #[arg(long)]
    pub list_analyzers: bool,

    /// Generate a default .gradewalk.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    ///
    /// Course, period, and API key may still come from the config file or
    /// environment; their presence is enforced after the merge, not here.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for modes that never touch the platform
        if self.init_config || self.list_analyzers {
            return Ok(());
        }

        if let Some(ref api_url) = self.api_url {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref assignments) = self.assignments {
            if assignments.iter().any(|name| name.trim().is_empty()) {
                return Err("Assignment names must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            course: Some("COS126".to_string()),
            period: Some("S2026".to_string()),
            api_key: Some("secret".to_string()),
            api_url: None,
            assignments: None,
            analyzers: None,
            output: PathBuf::from("test.md"),
            format: OutputFormat::Markdown,
            config: None,
            timeout: None,
            verbose: false,
            quiet: false,
            list_analyzers: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_api_url() {
        let mut args = make_args();
        args.api_url = Some("ftp://api.example.io".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_skipped_for_init_config() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
