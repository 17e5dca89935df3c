//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// perfstats - per-department employee performance statistics
///
/// Loads employee performance records into a SQLite store, then reports
/// mean/median/standard deviation per department, head counts, column
/// correlations, and text histograms and scatter plots.
///
/// Examples:
///   perfstats --seed-file MOCK_DATA.csv
///   perfstats --db company.db --no-seed --format json --output report.json
///   perfstats --departments Engineering,Support --bins 20
///   perfstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// SQLite database file (use :memory: for a throwaway store)
    #[arg(long, value_name = "PATH", env = "PERFSTATS_DB")]
    pub db: Option<String>,

    /// CSV seed file loaded into the store before analysis
    #[arg(short, long, value_name = "FILE")]
    pub seed_file: Option<PathBuf>,

    /// Analyze the existing table without reseeding it
    #[arg(long)]
    pub no_seed: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .perfstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output file path for the text charts
    #[arg(long, value_name = "FILE")]
    pub charts_output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Number of histogram bins
    #[arg(long, value_name = "COUNT")]
    pub bins: Option<usize>,

    /// Departments to draw histograms for (comma-separated)
    ///
    /// Example: --departments Engineering,Sales
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub departments: Option<Vec<String>>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .perfstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
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
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.bins == Some(0) {
            return Err("Bins must be at least 1".to_string());
        }

        if let Some(ref db) = self.db {
            if db.trim().is_empty() {
                return Err("Database path must not be empty".to_string());
            }
        }

        if self.no_seed && self.seed_file.is_some() {
            return Err("Cannot use --seed-file together with --no-seed".to_string());
        }

        if let Some(ref seed_file) = self.seed_file {
            if !seed_file.is_file() {
                return Err(format!("Seed file does not exist: {}", seed_file.display()));
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

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Args {
            db: None,
            seed_file: None,
            no_seed: false,
            config: None,
            output: None,
            charts_output: None,
            format: None,
            bins: None,
            departments: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "perfstats",
            "--db",
            ":memory:",
            "--departments",
            "Engineering,Sales",
            "--format",
            "json",
            "--bins",
            "12",
        ])
        .unwrap();

        assert_eq!(args.db.as_deref(), Some(":memory:"));
        assert_eq!(
            args.departments,
            Some(vec!["Engineering".to_string(), "Sales".to_string()])
        );
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.bins, Some(12));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = Args::for_tests();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_bins() {
        let mut args = Args::for_tests();
        args.bins = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_seed_file() {
        let mut args = Args::for_tests();
        args.seed_file = Some(PathBuf::from("does/not/exist.csv"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_seed_conflict() {
        let mut args = Args::for_tests();
        args.no_seed = true;
        args.seed_file = Some(PathBuf::from("MOCK_DATA.csv"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = Args::for_tests();
        args.init_config = true;
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::for_tests();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
