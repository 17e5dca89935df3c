//! In-memory columnar snapshot of the record set.
//!
//! A [`Dataset`] is built once from a record source and never mutated.
//! Every column is materialized at load time so that lookups by name
//! are a single match.

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{Column, ColumnKind, RawRecord, Record};
use std::collections::BTreeSet;
use tracing::debug;

/// Borrowed view of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnRef<'a> {
    /// Non-null integer key column.
    Key(&'a [i64]),
    Integer(&'a [Option<i64>]),
    Float(&'a [Option<f64>]),
    Text(&'a [String]),
}

#[allow(dead_code)] // Inspection helpers
impl ColumnRef<'_> {
    pub fn len(&self) -> usize {
        match self {
            ColumnRef::Key(v) => v.len(),
            ColumnRef::Integer(v) => v.len(),
            ColumnRef::Float(v) => v.len(),
            ColumnRef::Text(v) => v.len(),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnRef::Key(_) | ColumnRef::Integer(_) => ColumnKind::Integer,
            ColumnRef::Float(_) => ColumnKind::Float,
            ColumnRef::Text(_) => ColumnKind::Text,
        }
    }
}

/// Immutable, column-oriented record set.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    ids: Vec<i64>,
    employee_ids: Vec<i64>,
    departments: Vec<String>,
    performance_scores: Vec<Option<f64>>,
    years_with_company: Vec<Option<i64>>,
    salaries: Vec<Option<f64>>,
}

impl Dataset {
    /// Validates and loads raw rows. Fails on the first malformed row.
    pub fn load<I>(rows: I) -> AnalysisResult<Self>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| Record::from_raw(row, &raw))
            .collect::<AnalysisResult<Vec<_>>>()?;

        debug!("Loaded {} records into dataset", records.len());
        Ok(Self::from_records(records))
    }

    /// Builds a dataset from records that are already typed.
    pub fn from_records(records: Vec<Record>) -> Self {
        let n = records.len();
        let mut dataset = Self {
            ids: Vec::with_capacity(n),
            employee_ids: Vec::with_capacity(n),
            departments: Vec::with_capacity(n),
            performance_scores: Vec::with_capacity(n),
            years_with_company: Vec::with_capacity(n),
            salaries: Vec::with_capacity(n),
        };

        for record in records {
            dataset.ids.push(record.id);
            dataset.employee_ids.push(record.employee_id);
            dataset.departments.push(record.department);
            dataset.performance_scores.push(record.performance_score);
            dataset.years_with_company.push(record.years_with_company);
            dataset.salaries.push(record.salary);
        }

        dataset
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Rows reassembled from the columns, in source order.
    #[allow(dead_code)] // Row-level access for callers that need whole records
    pub fn records(&self) -> Vec<Record> {
        (0..self.len())
            .map(|i| Record {
                id: self.ids[i],
                employee_id: self.employee_ids[i],
                department: self.departments[i].clone(),
                performance_score: self.performance_scores[i],
                years_with_company: self.years_with_company[i],
                salary: self.salaries[i],
            })
            .collect()
    }

    /// Department key of every row, in source order.
    pub fn department_keys(&self) -> &[String] {
        &self.departments
    }

    /// Distinct departments in ascending order.
    pub fn departments(&self) -> Vec<&str> {
        self.departments
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Looks up a column by its schema name.
    pub fn column(&self, name: &str) -> AnalysisResult<ColumnRef<'_>> {
        let column: Column = name.parse()?;
        Ok(self.column_of(column))
    }

    /// Typed column access.
    pub fn column_of(&self, column: Column) -> ColumnRef<'_> {
        match column {
            Column::Id => ColumnRef::Key(&self.ids),
            Column::EmployeeId => ColumnRef::Key(&self.employee_ids),
            Column::Department => ColumnRef::Text(&self.departments),
            Column::PerformanceScore => ColumnRef::Float(&self.performance_scores),
            Column::YearsWithCompany => ColumnRef::Integer(&self.years_with_company),
            Column::Salary => ColumnRef::Float(&self.salaries),
        }
    }

    /// Numeric column widened to `f64`, with missing values kept in place.
    pub fn numeric_column(&self, name: &str) -> AnalysisResult<Vec<Option<f64>>> {
        match self.column(name)? {
            ColumnRef::Key(values) => Ok(values.iter().map(|&x| Some(x as f64)).collect()),
            ColumnRef::Integer(values) => Ok(values.iter().map(|v| v.map(|x| x as f64)).collect()),
            ColumnRef::Float(values) => Ok(values.to_vec()),
            ColumnRef::Text(_) => Err(AnalysisError::NonNumericColumn(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;

    fn raw(id: i64, department: &str, score: Value) -> RawRecord {
        RawRecord::new()
            .with("id", Value::Integer(id))
            .with("employee_id", Value::Integer(100 + id))
            .with("department", Value::Text(department.to_string()))
            .with("performance_score", score)
            .with("years_with_company", Value::Integer(id))
            .with("salary", Value::Real(40000.0 + id as f64))
    }

    #[test]
    fn test_load_materializes_columns() {
        let dataset = Dataset::load(vec![
            raw(1, "Eng", Value::Real(80.0)),
            raw(2, "Sales", Value::Null),
        ])
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.column("performance_score").unwrap(),
            ColumnRef::Float(&[Some(80.0), None])
        );
        assert_eq!(
            dataset.column("department").unwrap().kind(),
            ColumnKind::Text
        );
        assert_eq!(dataset.column("id").unwrap(), ColumnRef::Key(&[1, 2]));
        assert_eq!(dataset.column("employee_id").unwrap().kind(), ColumnKind::Integer);
    }

    #[test]
    fn test_records_rebuilt_from_columns() {
        let dataset = Dataset::load(vec![
            raw(1, "Eng", Value::Real(80.0)),
            raw(2, "Sales", Value::Null),
        ])
        .unwrap();
        let records = dataset.records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, 2);
        assert_eq!(records[1].employee_id, 102);
        assert_eq!(records[1].department, "Sales");
        assert_eq!(records[1].performance_score, None);
        assert_eq!(records[0].salary, Some(40001.0));
        assert_eq!(
            dataset.numeric_column("id").unwrap(),
            vec![Some(1.0), Some(2.0)]
        );
    }

    #[test]
    fn test_load_rejects_bad_row() {
        let rows = vec![
            raw(1, "Eng", Value::Real(80.0)),
            raw(2, "Eng", Value::Text("n/a".to_string())),
        ];
        match Dataset::load(rows) {
            Err(AnalysisError::Schema { row, field, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(field, "performance_score");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_column() {
        let dataset = Dataset::load(vec![raw(1, "Eng", Value::Real(80.0))]).unwrap();
        assert!(matches!(
            dataset.column("bonus"),
            Err(AnalysisError::UnknownColumn(name)) if name == "bonus"
        ));
    }

    #[test]
    fn test_numeric_column() {
        let dataset = Dataset::load(vec![raw(3, "Eng", Value::Real(80.0))]).unwrap();
        assert_eq!(
            dataset.numeric_column("years_with_company").unwrap(),
            vec![Some(3.0)]
        );
        assert!(matches!(
            dataset.numeric_column("department"),
            Err(AnalysisError::NonNumericColumn(_))
        ));
    }

    #[test]
    fn test_departments_sorted_and_distinct() {
        let dataset = Dataset::load(vec![
            raw(1, "Sales", Value::Real(1.0)),
            raw(2, "Eng", Value::Real(2.0)),
            raw(3, "Sales", Value::Real(3.0)),
            raw(4, "", Value::Real(4.0)),
        ])
        .unwrap();
        assert_eq!(dataset.departments(), vec!["", "Eng", "Sales"]);
    }

    #[test]
    fn test_empty_load() {
        let dataset = Dataset::load(Vec::new()).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.departments().is_empty());
    }
}
