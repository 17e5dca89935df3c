//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.perfstats.toml` files.

use crate::cli::OutputFormat;
use crate::models::Column;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".perfstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Seed loading settings.
    #[serde(default)]
    pub seed: SeedConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Connection parameters for the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file, or `:memory:`.
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Create the database file when it does not exist.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            create_if_missing: true,
        }
    }
}

fn default_store_path() -> String {
    "company_data.db".to_string()
}

fn default_true() -> bool {
    true
}

/// Seed file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Recreate the table and load the seed file before analyzing.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// CSV file with a header row and six columns.
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            csv_path: default_csv_path(),
        }
    }
}

fn default_csv_path() -> String {
    "MOCK_DATA.csv".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Text chart file path.
    #[serde(default = "default_charts_output")]
    pub charts_output: String,

    /// Number of histogram bins.
    #[serde(default = "default_bin_count")]
    pub bin_count: usize,

    /// Column plotted in the per-department histograms.
    #[serde(default = "default_histogram_column")]
    pub histogram_column: Column,

    /// Departments that get a histogram.
    #[serde(default = "default_histogram_departments")]
    pub histogram_departments: Vec<String>,

    /// Columns summarized per department.
    #[serde(default = "default_statistic_columns")]
    pub statistic_columns: Vec<Column>,

    /// Column pairs that are correlated and scatter-plotted.
    #[serde(default = "default_correlation_pairs")]
    pub correlation_pairs: Vec<(Column, Column)>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            charts_output: default_charts_output(),
            bin_count: default_bin_count(),
            histogram_column: default_histogram_column(),
            histogram_departments: default_histogram_departments(),
            statistic_columns: default_statistic_columns(),
            correlation_pairs: default_correlation_pairs(),
        }
    }
}

fn default_output() -> String {
    "perfstats_report.md".to_string()
}

fn default_charts_output() -> String {
    "perfstats_charts.txt".to_string()
}

fn default_bin_count() -> usize {
    10
}

fn default_histogram_column() -> Column {
    Column::PerformanceScore
}

fn default_histogram_departments() -> Vec<String> {
    vec!["Engineering", "Sales", "Services"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_statistic_columns() -> Vec<Column> {
    vec![Column::PerformanceScore, Column::Salary]
}

fn default_correlation_pairs() -> Vec<(Column, Column)> {
    vec![
        (Column::YearsWithCompany, Column::PerformanceScore),
        (Column::Salary, Column::PerformanceScore),
    ]
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
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only flags the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref db) = args.db {
            self.store.path = db.clone();
        }

        if let Some(ref seed_file) = args.seed_file {
            self.seed.csv_path = seed_file.display().to_string();
        }
        if args.no_seed {
            self.seed.enabled = false;
        }

        if let Some(ref output) = args.output {
            self.report.output = output.display().to_string();
        }
        if let Some(ref charts) = args.charts_output {
            self.report.charts_output = charts.display().to_string();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(bins) = args.bins {
            self.report.bin_count = bins;
        }
        if let Some(ref departments) = args.departments {
            self.report.histogram_departments = departments.clone();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
