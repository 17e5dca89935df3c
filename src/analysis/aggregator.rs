//! Department grouping and cross-column statistics.
//!
//! All functions here are pure: they read a [`Dataset`] and return new
//! values. Groups are recomputed on every call.

use crate::analysis::stats::{mean, median, pearson, sample_std_dev};
use crate::dataset::Dataset;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{Column, CorrelationMatrix, Statistic, SummaryRow};
use std::collections::BTreeMap;
use tracing::debug;

/// Pairs needed before a correlation is attempted.
const MIN_CORRELATION_PAIRS: usize = 2;

/// Partition the non-missing values of `column` by department key.
///
/// Every department present in the dataset gets an entry, even when all of
/// its values are missing.
fn partition<'a>(
    dataset: &'a Dataset,
    values: &[Option<f64>],
) -> BTreeMap<&'a str, Vec<f64>> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for (department, value) in dataset.department_keys().iter().zip(values) {
        let group = groups.entry(department.as_str()).or_default();
        if let Some(v) = value {
            group.push(*v);
        }
    }

    groups
}

/// Mean, median and sample standard deviation of `column` per department,
/// ordered by department.
pub fn group_statistics(dataset: &Dataset, column: &str) -> AnalysisResult<Vec<SummaryRow>> {
    let values = dataset.numeric_column(column)?;
    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let rows: Vec<SummaryRow> = partition(dataset, &values)
        .into_iter()
        .map(|(department, group)| SummaryRow {
            department: department.to_string(),
            count: group.len(),
            mean: mean(&group),
            median: median(&group),
            stddev: sample_std_dev(&group),
        })
        .collect();

    debug!(
        "Computed {} summary rows for column {}",
        rows.len(),
        column
    );
    Ok(rows)
}

/// Number of rows per department, ordered by department.
pub fn count_by_department(dataset: &Dataset) -> AnalysisResult<BTreeMap<String, usize>> {
    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for department in dataset.department_keys() {
        *counts.entry(department.clone()).or_default() += 1;
    }

    Ok(counts)
}

/// Pairwise-complete x/y series for two numeric columns.
pub fn paired_series(
    dataset: &Dataset,
    column_a: &str,
    column_b: &str,
) -> AnalysisResult<(Vec<f64>, Vec<f64>)> {
    let a = dataset.numeric_column(column_a)?;
    let b = dataset.numeric_column(column_b)?;

    Ok(a.into_iter()
        .zip(b)
        .filter_map(|pair| match pair {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .unzip())
}

/// Pearson correlation between two numeric columns over the whole dataset.
///
/// Rows missing either value are dropped first. Zero variance in either
/// column yields [`Statistic::Undefined`].
pub fn correlation(dataset: &Dataset, column_a: &str, column_b: &str) -> AnalysisResult<Statistic> {
    let (xs, ys) = paired_series(dataset, column_a, column_b)?;

    if xs.len() < MIN_CORRELATION_PAIRS {
        return Err(AnalysisError::InsufficientData {
            found: xs.len(),
            required: MIN_CORRELATION_PAIRS,
        });
    }

    let r = pearson(&xs, &ys);
    debug!(
        "Correlation {} x {} over {} pairs: {}",
        column_a,
        column_b,
        xs.len(),
        r
    );
    Ok(r)
}

/// Correlation coefficients for every pair of `columns`.
///
/// Unlike [`correlation`], a pair without enough complete rows becomes
/// [`Statistic::Undefined`] instead of failing the whole matrix.
pub fn correlation_matrix(dataset: &Dataset, columns: &[Column]) -> AnalysisResult<CorrelationMatrix> {
    let mut cells = Vec::with_capacity(columns.len() * columns.len());

    for a in columns {
        for b in columns {
            let cell = match correlation(dataset, a.name(), b.name()) {
                Ok(r) => r,
                Err(AnalysisError::InsufficientData { .. }) => Statistic::Undefined,
                Err(e) => return Err(e),
            };
            cells.push(cell);
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        cells,
    })
}

/// Values of `column` for rows whose department equals `department` exactly.
///
/// Returns an empty series when no row matches. Missing values are dropped.
pub fn filter_by_department(
    dataset: &Dataset,
    department: &str,
    column: &str,
) -> AnalysisResult<Vec<f64>> {
    let values = dataset.numeric_column(column)?;

    Ok(dataset
        .department_keys()
        .iter()
        .zip(values)
        .filter(|(d, _)| d.as_str() == department)
        .filter_map(|(_, v)| v)
        .collect())
}
