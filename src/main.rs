//! perfstats - Employee Performance Statistics
//!
//! A CLI tool that loads employee performance records into a SQLite
//! store and reports per-department statistics, head counts, column
//! correlations, and text charts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (bad arguments, unreachable store, malformed data, ...)

mod analysis;
mod cli;
mod config;
mod dataset;
mod error;
mod models;
mod report;
mod store;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, ReportConfig, SeedConfig, CONFIG_FILE_NAME};
use dataset::Dataset;
use error::AnalysisResult;
use indicatif::{ProgressBar, ProgressStyle};
use models::{Column, ColumnSummary, CorrelationEntry, Report, ReportMetadata};
use report::{ChartSink, TextChartSink};
use std::path::Path;
use std::time::Instant;
use store::{BulkSink, RecordSource, SqliteStore};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("perfstats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .perfstats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the store, seed file, and report.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Run the complete load-and-report workflow.
fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Open the store
    let mut store = SqliteStore::open(&config.store).context("Failed to open record store")?;

    // Step 2: Seed it
    if config.seed.enabled {
        seed_store(&mut store, &config.seed, !args.quiet)?;
    } else {
        info!("Seeding disabled, analyzing existing table");
    }

    // Step 3: Snapshot the records
    let rows = store.fetch_all().context("Failed to fetch records")?;
    let dataset = Dataset::load(rows).context("Failed to load records")?;
    info!("Loaded {} records", dataset.len());

    // Step 4: Aggregate and draw
    let mut charts = TextChartSink::default();
    let mut report = build_report(&dataset, &config.report, &store.describe(), &mut charts)?;
    report.metadata.duration_seconds = start_time.elapsed().as_secs_f64();

    if !args.quiet {
        print_summary(&report);
    }

    // Step 5: Save outputs
    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };
    let output_path = Path::new(&config.report.output);
    report::write_output(&output, output_path)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    let charts_path = Path::new(&config.report.charts_output);
    report::write_output(charts.output(), charts_path)
        .with_context(|| format!("Failed to write charts to {}", charts_path.display()))?;

    println!(
        "\n✅ Report saved to: {} ({} charts in {})",
        output_path.display(),
        charts.chart_count(),
        charts_path.display()
    );

    Ok(())
}

/// Replace the table contents with the seed file in one transaction.
fn seed_store(store: &mut SqliteStore, seed: &SeedConfig, show_progress: bool) -> Result<usize> {
    let path = Path::new(&seed.csv_path);
    println!("📥 Seeding store from {}", path.display());

    let rows = store::open_seed_file(path)?;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} rows loaded")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Some(pb)
    } else {
        None
    };

    let result = store.replace_all(rows.inspect(|_| {
        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }));

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let inserted = result
        .with_context(|| format!("Failed to load seed file {}", path.display()))?;
    debug!("Store now holds {} rows", store.row_count()?);
    println!("   Loaded {} rows", inserted);
    Ok(inserted)
}

/// Compute every report section and draw the charts.
fn build_report(
    dataset: &Dataset,
    settings: &ReportConfig,
    source: &str,
    charts: &mut impl ChartSink,
) -> AnalysisResult<Report> {
    let summaries = settings
        .statistic_columns
        .iter()
        .map(|column| {
            analysis::group_statistics(dataset, column.name()).map(|rows| ColumnSummary {
                column: *column,
                rows,
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    let employees_by_department = analysis::count_by_department(dataset)?;

    let correlations = settings
        .correlation_pairs
        .iter()
        .map(|(a, b)| {
            analysis::correlation(dataset, a.name(), b.name()).map(|coefficient| {
                CorrelationEntry {
                    column_a: *a,
                    column_b: *b,
                    coefficient,
                }
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    let correlation_matrix = analysis::correlation_matrix(dataset, &Column::measures())?;

    for department in &settings.histogram_departments {
        let series =
            analysis::filter_by_department(dataset, department, settings.histogram_column.name())?;
        if series.is_empty() {
            warn!("No {} values for department {:?}", settings.histogram_column, department);
        }
        charts.draw_histogram(
            &series,
            settings.bin_count,
            &format!(
                "Histogram of {} for {}",
                settings.histogram_column, department
            ),
        );
    }

    for (a, b) in &settings.correlation_pairs {
        let (xs, ys) = analysis::paired_series(dataset, a.name(), b.name())?;
        charts.draw_scatter(&xs, &ys, a.name(), b.name());
    }

    Ok(Report {
        metadata: ReportMetadata {
            source: source.to_string(),
            generated_at: Utc::now(),
            record_count: dataset.len(),
            department_count: dataset.departments().len(),
            duration_seconds: 0.0,
        },
        summaries,
        employees_by_department,
        correlations,
        correlation_matrix,
    })
}

/// Print the computed statistics to stdout.
fn print_summary(report: &Report) {
    for summary in &report.summaries {
        println!("\n📊 By {}:", summary.column);
        println!(
            "   {:<20} {:>6} {:>14} {:>14} {:>14}",
            "Department", "Count", "Mean", "Median", "Std. Dev."
        );
        for row in &summary.rows {
            println!(
                "   {:<20} {:>6} {:>14.2} {:>14.2} {:>14.2}",
                row.department,
                row.count,
                row.mean,
                row.median,
                row.stddev
            );
        }
    }

    println!("\n👥 Employees by department:");
    for (department, count) in &report.employees_by_department {
        println!("   {:<20} {:>6}", department, count);
    }

    println!("\n🔗 Correlations:");
    for entry in &report.correlations {
        println!(
            "   {} vs {}: {:.4}",
            entry.column_a, entry.column_b, entry.coefficient
        );
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
