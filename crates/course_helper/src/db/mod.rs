/// Database module for the course catalog store

mod types;

pub use types::{CourseFilter, SearchColumns};

use crate::catalog::{CatalogError, Course};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_catalog.sql");

const MATCH_CLAUSE: &str = "(?1 = ''
        OR instr(code_lc, ?1) > 0
        OR instr(name_zh_lc, ?1) > 0
        OR instr(name_en_lc, ?1) > 0
        OR instr(teachers_lc, ?1) > 0)";

/// Read access to a catalog of course documents.
pub trait CatalogStore: Send + Sync {
    /// Checks that the store is reachable.
    fn ping(&self) -> Result<(), CatalogError>;

    /// Counts courses matching the filter.
    fn count_matching(&self, filter: &CourseFilter) -> Result<u64, CatalogError>;

    /// Returns matching courses in ascending `code` order, skipping `skip` and taking `take`.
    fn find_page(
        &self,
        filter: &CourseFilter,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Course>, CatalogError>;

    /// Returns every course in ascending `code` order.
    fn find_all(&self) -> Result<Vec<Course>, CatalogError>;
}

pub struct CatalogDbManager {
    db: Mutex<Connection>,
}

impl CatalogDbManager {
    /// Opens (or creates) the catalog database and initializes the schema
    pub fn open(db_path: &str) -> Result<Self, CatalogError> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// Opens a private in-memory catalog
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, CatalogError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.db.lock().map_err(|_| CatalogError::Database {
            message: "catalog connection lock poisoned".to_string(),
        })
    }

    /// Checks if the catalog has no courses yet
    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        let db = self.lock()?;
        let found: Option<i64> = db
            .query_row("SELECT 1 FROM courses LIMIT 1", [], |row| row.get(0))
            .optional()?;
        Ok(found.is_none())
    }

    /// Inserts or replaces courses by `id` in a single transaction
    pub fn upsert_courses(&self, courses: &[Course]) -> Result<usize, CatalogError> {
        if courses.is_empty() {
            return Ok(0);
        }

        let mut db = self.lock()?;
        let tx = db.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO courses (
                    id, code, code_lc, name_zh_lc, name_en_lc, teachers_lc, doc, imported_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, datetime('now'))
                 ON CONFLICT(id) DO UPDATE SET
                    code = excluded.code,
                    code_lc = excluded.code_lc,
                    name_zh_lc = excluded.name_zh_lc,
                    name_en_lc = excluded.name_en_lc,
                    teachers_lc = excluded.teachers_lc,
                    doc = excluded.doc,
                    imported_at = excluded.imported_at",
            )?;

            for course in courses {
                let cols = SearchColumns::from_course(course);
                let doc = serde_json::to_string(course)?;
                stmt.execute((
                    &course.id,
                    &course.code,
                    &cols.code_lc,
                    &cols.name_zh_lc,
                    &cols.name_en_lc,
                    &cols.teachers_lc,
                    doc,
                ))?;
            }
        }
        tx.commit()?;

        Ok(courses.len())
    }

    /// Imports a JSON array of course documents, skipping records that don't decode
    pub fn import_json(&self, path: &Path) -> Result<usize, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&content)?;
        let total = records.len();

        let courses: Vec<Course> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Course>(record) {
                Ok(course) => Some(course),
                Err(e) => {
                    warn!("Skipping catalog record #{}: {}", index, e);
                    None
                }
            })
            .collect();

        let imported = self.upsert_courses(&courses)?;
        info!(
            "Imported {} of {} catalog records from {}",
            imported,
            total,
            path.display()
        );

        Ok(imported)
    }
}

impl CatalogStore for CatalogDbManager {
    fn ping(&self) -> Result<(), CatalogError> {
        let db = self.lock()?;
        db.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn count_matching(&self, filter: &CourseFilter) -> Result<u64, CatalogError> {
        let db = self.lock()?;
        let count: i64 = db.query_row(
            &format!("SELECT COUNT(*) FROM courses WHERE {MATCH_CLAUSE}"),
            [filter.needle()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    fn find_page(
        &self,
        filter: &CourseFilter,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Course>, CatalogError> {
        let db = self.lock()?;
        let mut stmt = db.prepare(&format!(
            "SELECT doc FROM courses
             WHERE {MATCH_CLAUSE}
             ORDER BY code ASC, id ASC
             LIMIT ?2 OFFSET ?3"
        ))?;

        let take = i64::try_from(take).unwrap_or(i64::MAX);
        let skip = i64::try_from(skip).unwrap_or(i64::MAX);
        let docs = stmt
            .query_map((filter.needle(), take, skip), |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        docs.iter()
            .map(|doc| serde_json::from_str(doc).map_err(CatalogError::from))
            .collect()
    }

    fn find_all(&self) -> Result<Vec<Course>, CatalogError> {
        let db = self.lock()?;
        let mut stmt = db.prepare("SELECT doc FROM courses ORDER BY code ASC, id ASC")?;
        let docs = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        docs.iter()
            .map(|doc| serde_json::from_str(doc).map_err(CatalogError::from))
            .collect()
    }
}
