//! Data models for performance analysis.
//!
//! This module contains the record schema, the untyped row shape that
//! sources produce, and the result types the engine and reports share.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Physical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    /// Integer and float columns can be aggregated.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

/// A column of the `employee_performance` schema, in field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    EmployeeId,
    Department,
    PerformanceScore,
    YearsWithCompany,
    Salary,
}

impl Column {
    /// All columns in schema order.
    pub const ALL: [Column; 6] = [
        Column::Id,
        Column::EmployeeId,
        Column::Department,
        Column::PerformanceScore,
        Column::YearsWithCompany,
        Column::Salary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::EmployeeId => "employee_id",
            Column::Department => "department",
            Column::PerformanceScore => "performance_score",
            Column::YearsWithCompany => "years_with_company",
            Column::Salary => "salary",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Id | Column::EmployeeId | Column::YearsWithCompany => ColumnKind::Integer,
            Column::PerformanceScore | Column::Salary => ColumnKind::Float,
            Column::Department => ColumnKind::Text,
        }
    }

    /// Numeric columns that describe an employee (the surrogate `id` is excluded).
    pub fn measures() -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| c.kind().is_numeric() && *c != Column::Id)
            .collect()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Column {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| AnalysisError::UnknownColumn(s.to_string()))
    }
}

/// A single cell as delivered by a record source, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
        }
    }
}

/// An untyped row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub fields: BTreeMap<String, Value>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[allow(dead_code)]
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    fn require(&self, row: usize, column: Column) -> Result<&Value, AnalysisError> {
        self.fields
            .get(column.name())
            .ok_or_else(|| AnalysisError::schema(row, column.name(), "is missing"))
    }

    fn integer(&self, row: usize, column: Column) -> Result<Option<i64>, AnalysisError> {
        match self.require(row, column)? {
            Value::Null => Ok(None),
            Value::Integer(v) => Ok(Some(*v)),
            other => Err(mismatch(row, column, other)),
        }
    }

    fn float(&self, row: usize, column: Column) -> Result<Option<f64>, AnalysisError> {
        match self.require(row, column)? {
            Value::Null => Ok(None),
            Value::Integer(v) => Ok(Some(*v as f64)),
            Value::Real(v) => Ok(Some(*v)),
            other => Err(mismatch(row, column, other)),
        }
    }

    fn required_integer(&self, row: usize, column: Column) -> Result<i64, AnalysisError> {
        self.integer(row, column)?
            .ok_or_else(|| AnalysisError::schema(row, column.name(), "must not be null"))
    }
}

fn mismatch(row: usize, column: Column, found: &Value) -> AnalysisError {
    let expected = match column.kind() {
        ColumnKind::Integer => "an integer",
        ColumnKind::Float => "a number",
        ColumnKind::Text => "text",
    };
    AnalysisError::schema(
        row,
        column.name(),
        format!("expected {}, found {}", expected, found.type_name()),
    )
}

/// A validated employee-performance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Surrogate key assigned by the store.
    pub id: i64,
    pub employee_id: i64,
    pub department: String,
    pub performance_score: Option<f64>,
    pub years_with_company: Option<i64>,
    pub salary: Option<f64>,
}

impl Record {
    /// Validates a raw row; `row` is its position in the source, used in errors.
    pub fn from_raw(row: usize, raw: &RawRecord) -> Result<Self, AnalysisError> {
        let department = match raw.require(row, Column::Department)? {
            Value::Text(s) => s.clone(),
            Value::Null => {
                return Err(AnalysisError::schema(
                    row,
                    Column::Department.name(),
                    "must not be null",
                ))
            }
            other => return Err(mismatch(row, Column::Department, other)),
        };

        Ok(Self {
            id: raw.required_integer(row, Column::Id)?,
            employee_id: raw.required_integer(row, Column::EmployeeId)?,
            department,
            performance_score: raw.float(row, Column::PerformanceScore)?,
            years_with_company: raw.integer(row, Column::YearsWithCompany)?,
            salary: raw.float(row, Column::Salary)?,
        })
    }
}

/// One row of the seed file, in insert order. A missing id lets the store assign one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedRow(
    pub Option<i64>,
    pub i64,
    pub String,
    pub Option<f64>,
    pub Option<i64>,
    pub Option<f64>,
);

/// A statistic that may be mathematically undefined for the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "value")]
pub enum Statistic {
    Defined(f64),
    Undefined,
}

impl Statistic {
    pub fn value(&self) -> Option<f64> {
        match self {
            Statistic::Defined(v) => Some(*v),
            Statistic::Undefined => None,
        }
    }

    #[allow(dead_code)]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Statistic::Undefined)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Statistic::Defined(v) => match f.precision() {
                Some(p) => format!("{:.*}", p, v),
                None => v.to_string(),
            },
            Statistic::Undefined => "undefined".to_string(),
        };
        match f.width() {
            Some(width) => write!(f, "{:>width$}", text),
            None => f.write_str(&text),
        }
    }
}

/// Per-department summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub department: String,
    /// Number of non-null values that entered the statistics.
    pub count: usize,
    pub mean: Statistic,
    pub median: Statistic,
    pub stddev: Statistic,
}

/// Pearson coefficients for every pair of a set of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<Column>,
    /// Row-major, `columns.len()` squared cells.
    pub cells: Vec<Statistic>,
}

#[allow(dead_code)] // Lookup helper for library-style callers
impl CorrelationMatrix {
    pub fn get(&self, a: Column, b: Column) -> Option<Statistic> {
        let n = self.columns.len();
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        self.cells.get(i * n + j).copied()
    }
}

/// Group statistics of a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: Column,
    pub rows: Vec<SummaryRow>,
}

/// Correlation between two columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub column_a: Column,
    pub column_b: Column,
    pub coefficient: Statistic,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the records were read from.
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub department_count: usize,
    pub duration_seconds: f64,
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summaries: Vec<ColumnSummary>,
    pub employees_by_department: BTreeMap<String, usize>,
    pub correlations: Vec<CorrelationEntry>,
    pub correlation_matrix: CorrelationMatrix,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row() -> RawRecord {
        RawRecord::new()
            .with("id", Value::Integer(1))
            .with("employee_id", Value::Integer(1001))
            .with("department", Value::Text("Sales".to_string()))
            .with("performance_score", Value::Real(77.5))
            .with("years_with_company", Value::Integer(4))
            .with("salary", Value::Integer(52000))
    }

    #[test]
    fn test_column_from_str() {
        assert_eq!("salary".parse::<Column>().unwrap(), Column::Salary);
        assert_eq!(
            "years_with_company".parse::<Column>().unwrap(),
            Column::YearsWithCompany
        );
        assert!(matches!(
            "Salary".parse::<Column>(),
            Err(AnalysisError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_measures_exclude_id_and_text() {
        let measures = Column::measures();
        assert_eq!(
            measures,
            vec![
                Column::EmployeeId,
                Column::PerformanceScore,
                Column::YearsWithCompany,
                Column::Salary
            ]
        );
    }

    #[test]
    fn test_record_from_raw_widens_integers() {
        let record = Record::from_raw(0, &full_row()).unwrap();
        assert_eq!(record.department, "Sales");
        assert_eq!(record.salary, Some(52000.0));
        assert_eq!(record.years_with_company, Some(4));
    }

    #[test]
    fn test_record_from_raw_missing_field() {
        let mut raw = full_row();
        raw.fields.remove("department");
        let err = Record::from_raw(7, &raw).unwrap_err();
        match err {
            AnalysisError::Schema { row, field, .. } => {
                assert_eq!(row, 7);
                assert_eq!(field, "department");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_record_from_raw_type_mismatch() {
        let raw = full_row().with("performance_score", Value::Text("high".to_string()));
        assert!(matches!(
            Record::from_raw(0, &raw),
            Err(AnalysisError::Schema { .. })
        ));

        let raw = full_row().with("years_with_company", Value::Real(2.5));
        assert!(matches!(
            Record::from_raw(0, &raw),
            Err(AnalysisError::Schema { .. })
        ));
    }

    #[test]
    fn test_record_from_raw_null_measure_is_missing() {
        let raw = full_row().with("salary", Value::Null);
        let record = Record::from_raw(0, &raw).unwrap();
        assert_eq!(record.salary, None);

        let raw = full_row().with("employee_id", Value::Null);
        assert!(Record::from_raw(0, &raw).is_err());
    }

    #[test]
    fn test_statistic_display() {
        assert_eq!(format!("{:.2}", Statistic::Defined(7.0710678)), "7.07");
        assert_eq!(format!("{:.2}", Statistic::Undefined), "undefined");
        assert_eq!(format!("{:>6.1}", Statistic::Defined(2.26)), "   2.3");
        assert_eq!(format!("{:>10}", Statistic::Undefined), " undefined");
        assert_eq!(Statistic::Undefined.value(), None);
    }

    #[test]
    fn test_statistic_serializes_undefined_explicitly() {
        let json = serde_json::to_string(&Statistic::Undefined).unwrap();
        assert_eq!(json, r#"{"status":"undefined"}"#);
        let json = serde_json::to_string(&Statistic::Defined(1.5)).unwrap();
        assert_eq!(json, r#"{"status":"defined","value":1.5}"#);
    }
}
