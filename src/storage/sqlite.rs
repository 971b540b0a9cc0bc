use crate::model::{BrandAssignment, CandidateRecord, RawConnection, StorageError};
use crate::normalizer::list_contains;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Catalog item as stored by the scrapers feeding this job.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    pub source: String,
    pub country_code: String,
    pub source_id: String,
    pub title: String,
    pub manufacturer: Option<String>,
    pub newest: bool,
    pub removed_at: Option<DateTime<Utc>>,
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and runs migrations
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS catalog_items (
                source TEXT NOT NULL,
                country_code TEXT NOT NULL,
                source_id TEXT NOT NULL,
                title TEXT NOT NULL,
                manufacturer TEXT,
                newest INTEGER NOT NULL DEFAULT 1,
                PRIMARY KEY (source, country_code, source_id)
            );

            CREATE TABLE IF NOT EXISTS brand_connections (
                primary_brand TEXT NOT NULL,
                related_brands TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS brand_assignments (
                id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                country_code TEXT NOT NULL,
                source_id TEXT NOT NULL,
                brand TEXT,
                meta TEXT NOT NULL DEFAULT '{}',
                assigned_at TEXT NOT NULL
            );
            "
        )?;

        // older catalog dumps predate removal tracking
        Self::migrate_add_column_if_missing(&conn, "catalog_items", "removed_at", "TEXT")?;

        Ok(Self { conn })
    }

    /// Adds a column to the table unless it already exists
    fn migrate_add_column_if_missing(
        conn: &Connection,
        table: &str,
        column: &str,
        column_def: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing_columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing_columns.iter().any(|c| c == column) {
            let alter_sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def);
            conn.execute(&alter_sql, [])?;
        }

        Ok(())
    }

    pub fn save_item(&self, item: &CatalogItem) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO catalog_items (
                source, country_code, source_id, title, manufacturer, newest, removed_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &item.source,
                &item.country_code,
                &item.source_id,
                &item.title,
                &item.manufacturer,
                &item.newest,
                &item.removed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    pub fn save_connection(&self, primary: &str, related: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO brand_connections (primary_brand, related_brands) VALUES (?1, ?2)",
            params![primary, related],
        )?;
        Ok(())
    }

    /// Co-occurrence rows in insertion order.
    pub fn get_brand_connections(&self) -> Result<Vec<RawConnection>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT primary_brand, related_brands FROM brand_connections ORDER BY rowid ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RawConnection {
                primary: row.get(0)?,
                related: row.get(1)?,
            })
        })?;

        let mut connections = Vec::new();
        for row in rows {
            connections.push(row?);
        }

        Ok(connections)
    }

    /// Live, newest items of one source/country whose manufacturer is unknown or generic
    /// and that were not yet handled under `version_key`. `existing_mapping` carries the
    /// brand of an assignment made by another process.
    pub fn get_candidates(
        &self,
        source: &str,
        country_code: &str,
        generic_brands: &[String],
        version_key: &str,
    ) -> Result<Vec<CandidateRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT i.title, i.source_id, i.manufacturer, a.brand, a.meta
             FROM catalog_items i
             LEFT JOIN brand_assignments a
                ON a.source = i.source AND a.country_code = i.country_code AND a.source_id = i.source_id
             WHERE i.source = ?1 AND i.country_code = ?2
               AND i.newest = 1 AND i.removed_at IS NULL
             ORDER BY i.source_id ASC",
        )?;

        let rows = stmt.query_map(params![source, country_code], |row| {
            let manufacturer: Option<String> = row.get(2)?;
            let meta: Option<String> = row.get(4)?;
            Ok((Self::map_candidate(row)?, manufacturer, meta))
        })?;

        let mut candidates = Vec::new();
        for row in rows {
            let (candidate, manufacturer, meta) = row?;
            if let Some(m) = manufacturer.as_deref() {
                if !list_contains(generic_brands, m) {
                    continue;
                }
            }
            if let Some(meta) = meta {
                let meta: serde_json::Value = serde_json::from_str(&meta)?;
                if meta.get(version_key).is_some() {
                    continue;
                }
            }
            candidates.push(candidate);
        }

        Ok(candidates)
    }

    fn map_candidate(row: &Row) -> Result<CandidateRecord, rusqlite::Error> {
        Ok(CandidateRecord {
            title: row.get(0)?,
            source_id: row.get(1)?,
            existing_mapping: row.get(3)?,
        })
    }

    /// Inserts or replaces the assignment row
    pub fn save_assignment(&self, assignment: &BrandAssignment) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO brand_assignments (
                id, source, country_code, source_id, brand, meta, assigned_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &assignment.id,
                &assignment.source,
                &assignment.country_code,
                &assignment.source_id,
                &assignment.brand,
                &serde_json::to_string(&assignment.meta)?,
                &assignment.assigned_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_assignment(&self, id: &str) -> Result<Option<BrandAssignment>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, source, country_code, source_id, brand, meta, assigned_at
                 FROM brand_assignments WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, source, country_code, source_id, brand, meta, assigned_at)) = row else {
            return Ok(None);
        };
        let assigned_at = assigned_at.parse::<DateTime<Utc>>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Some(BrandAssignment {
            id,
            source,
            country_code,
            source_id,
            brand,
            meta: serde_json::from_str(&meta)?,
            assigned_at,
        }))
    }

    pub fn count_assignments(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM brand_assignments", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
