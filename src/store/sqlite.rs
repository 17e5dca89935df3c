//! SQLite-backed employee performance store.

use crate::config::StoreConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{Column, RawRecord, SeedRow, Value};
use crate::store::{BulkSink, RecordSource};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row, Transaction};
use tracing::{debug, info, warn};

/// Name of the table holding the records.
pub const TABLE_NAME: &str = "employee_performance";

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE employee_performance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id INTEGER,
        department TEXT,
        performance_score REAL,
        years_with_company INTEGER,
        salary REAL
    )
";

const INSERT_SQL: &str = "
    INSERT INTO employee_performance (
        id, employee_id, department, performance_score,
        years_with_company, salary
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

const SELECT_ALL_SQL: &str = "
    SELECT id, employee_id, department, performance_score,
           years_with_company, salary
    FROM employee_performance
    ORDER BY id
";

/// A connection to the store.
pub struct SqliteStore {
    conn: Connection,
    location: String,
}

impl SqliteStore {
    /// Open the store described by `config`.
    pub fn open(config: &StoreConfig) -> AnalysisResult<Self> {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if config.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }

        let opened = if config.path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open_with_flags(&config.path, flags)
        };
        let conn = opened
            .map_err(|e| AnalysisError::SourceUnavailable(format!("{}: {}", config.path, e)))?;

        debug!("Opened store at {}", config.path);
        Ok(Self {
            conn,
            location: config.path.clone(),
        })
    }

    /// Drop and recreate the records table.
    #[allow(dead_code)] // Schema reset without a reload; seeding uses `replace_all`
    pub fn init_table(&self) -> AnalysisResult<()> {
        recreate_table(&self.conn)?;
        info!("Initialized table {}", TABLE_NAME);
        Ok(())
    }

    /// Number of rows currently stored.
    pub fn row_count(&self) -> AnalysisResult<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", TABLE_NAME),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn recreate_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&format!("DROP TABLE IF EXISTS {};", TABLE_NAME))?;
    conn.execute_batch(CREATE_TABLE_SQL)
}

/// Insert every row through one prepared statement inside `tx`.
fn insert_rows<I>(tx: &Transaction<'_>, rows: I) -> AnalysisResult<usize>
where
    I: IntoIterator<Item = AnalysisResult<SeedRow>>,
{
    let mut stmt = tx.prepare(INSERT_SQL)?;
    let mut inserted = 0usize;

    for row in rows {
        let SeedRow(id, employee_id, department, score, years, salary) = row.map_err(|e| {
            warn!("Seed row rejected after {} inserts: {}", inserted, e);
            e
        })?;
        stmt.execute(params![id, employee_id, department, score, years, salary])?;
        inserted += 1;
    }

    Ok(inserted)
}

fn raw_from_row(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    let mut raw = RawRecord::new();
    for (i, column) in Column::ALL.iter().enumerate() {
        let value = match row.get_ref(i)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Integer(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(_) => {
                return Err(rusqlite::Error::InvalidColumnType(
                    i,
                    column.name().to_string(),
                    rusqlite::types::Type::Blob,
                ))
            }
        };
        raw.fields.insert(column.name().to_string(), value);
    }
    Ok(raw)
}

impl RecordSource for SqliteStore {
    fn fetch_all(&self) -> AnalysisResult<Vec<RawRecord>> {
        let mut stmt = self.conn.prepare(SELECT_ALL_SQL)?;
        let rows = stmt
            .query_map([], |row| raw_from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Fetched {} rows from {}", rows.len(), TABLE_NAME);
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.location)
    }
}

impl BulkSink for SqliteStore {
    fn bulk_insert<I>(&mut self, rows: I) -> AnalysisResult<usize>
    where
        I: IntoIterator<Item = AnalysisResult<SeedRow>>,
    {
        // Dropping `tx` on an early return rolls the batch back.
        let tx = self.conn.transaction()?;
        let inserted = insert_rows(&tx, rows)?;
        tx.commit()?;

        info!("Bulk-loaded {} rows into {}", inserted, TABLE_NAME);
        Ok(inserted)
    }

    fn replace_all<I>(&mut self, rows: I) -> AnalysisResult<usize>
    where
        I: IntoIterator<Item = AnalysisResult<SeedRow>>,
    {
        let tx = self.conn.transaction()?;
        recreate_table(&tx)?;
        let inserted = insert_rows(&tx, rows)?;
        tx.commit()?;

        info!("Replaced {} with {} rows", TABLE_NAME, inserted);
        Ok(inserted)
    }
}
