//! Record sources and bulk-load sinks.
//!
//! The analysis only depends on the [`RecordSource`] contract; the SQLite
//! store and the in-memory source are interchangeable behind it.

pub mod seed;
pub mod sqlite;

pub use seed::open_seed_file;
pub use sqlite::SqliteStore;

use crate::error::AnalysisResult;
use crate::models::{RawRecord, SeedRow};

/// Anything that can hand over the complete record set.
pub trait RecordSource {
    /// Fetch every row, ordered by `id`.
    fn fetch_all(&self) -> AnalysisResult<Vec<RawRecord>>;

    /// Human-readable description used in report metadata.
    fn describe(&self) -> String;
}

/// Destination for seed rows.
pub trait BulkSink {
    /// Insert every row or none of them.
    ///
    /// The iterator is consumed once. The first `Err` it yields, or the first
    /// insert that fails, discards the whole batch.
    #[allow(dead_code)] // Appends; the CLI always reloads through `replace_all`
    fn bulk_insert<I>(&mut self, rows: I) -> AnalysisResult<usize>
    where
        I: IntoIterator<Item = AnalysisResult<SeedRow>>;

    /// Recreate the destination and load `rows` into it as one unit.
    ///
    /// On failure the previous contents stay in place.
    fn replace_all<I>(&mut self, rows: I) -> AnalysisResult<usize>
    where
        I: IntoIterator<Item = AnalysisResult<SeedRow>>;
}

/// Fixed set of rows held in memory.
#[allow(dead_code)] // Fixture source; the CLI always reads from SQLite
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<RawRecord>,
}

#[allow(dead_code)]
impl MemorySource {
    pub fn new(rows: Vec<RawRecord>) -> Self {
        Self { rows }
    }
}

impl RecordSource for MemorySource {
    fn fetch_all(&self) -> AnalysisResult<Vec<RawRecord>> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} rows)", self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::models::Value;

    #[test]
    fn test_memory_source_feeds_dataset() {
        let row = RawRecord::new()
            .with("id", Value::Integer(1))
            .with("employee_id", Value::Integer(7))
            .with("department", Value::Text("Services".to_string()))
            .with("performance_score", Value::Real(66.0))
            .with("years_with_company", Value::Integer(2))
            .with("salary", Value::Real(41000.0));
        let source = MemorySource::new(vec![row]);

        let dataset = Dataset::load(source.fetch_all().unwrap()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(source.describe(), "memory (1 rows)");
    }
}
