//! Configuration for the xcodelog command-line tool
//!
//! This module provides the CLI surface: input/output selection, the
//! project root used to filter dependency warnings, and logging options.

use std::path::PathBuf;

use clap::Parser;

/// xcodelog - turn captured xcodebuild output into a structured JSON report
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "xcodelog")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Captured log file to parse
    ///
    /// Reads from stdin when omitted, so xcodebuild output can be piped in:
    ///   xcodebuild -scheme MyApp test 2>&1 | xcodelog
    pub input: Option<PathBuf>,

    /// Write the JSON report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long, default_value = "false")]
    pub pretty: bool,

    /// Project root used to filter out warnings from dependencies and SDKs
    ///
    /// Defaults to the current working directory.
    #[arg(short, long, env = "XCODELOG_ROOT")]
    pub root: Option<PathBuf>,

    /// Exit with status 1 when the report contains build errors or failed
    /// tests
    ///
    /// Useful in CI pipelines where the parse itself succeeds but the build
    /// did not.
    #[arg(long, default_value = "false")]
    pub fail_on_issues: bool,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the JSON report
    /// on stdout.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Config {
    /// Get the project root, using the current directory as default
    ///
    /// Returns `None` if no root is specified and the current directory
    /// cannot be determined.
    #[must_use]
    pub fn project_root(&self) -> Option<PathBuf> {
        self.root.clone().or_else(|| std::env::current_dir().ok())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file is specified but doesn't exist
    /// - The root path is specified but is not a directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.clone()));
            }
        }

        if let Some(ref root) = self.root {
            if !root.is_dir() {
                return Err(ConfigError::RootNotDirectory(root.clone()));
            }
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input log file not found
    #[error("Input log file not found: {0}")]
    InputNotFound(PathBuf),

    /// Root path is not a directory
    #[error("Root path is not a directory: {0}")]
    RootNotDirectory(PathBuf),
}
