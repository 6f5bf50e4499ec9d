//! Package catalog store
//!
//! One SQLite table keyed by package name. The store is only ever touched
//! through short-lived sessions: a session opens a transaction, runs the
//! caller's queries and either commits or rolls back according to its
//! [`SessionPolicy`]. Rows come back as owned [`CatalogEntry`] values, so
//! nothing loaded in a session stays attached to it.

use crate::error::Result;
use crate::types::{CatalogEntry, CatalogFilter};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS packages (
    pkgname      TEXT PRIMARY KEY NOT NULL,
    config       TEXT NOT NULL DEFAULT '{}',
    is_available INTEGER NOT NULL DEFAULT 0,
    is_installed INTEGER NOT NULL DEFAULT 0,
    files_list   TEXT NOT NULL DEFAULT '[]',
    CHECK (is_installed = 0 OR is_available = 1)
);
";

/// Whether a session commits its work when the caller's closure succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub commit: bool,
}

impl SessionPolicy {
    /// Read-only session; any writes are rolled back
    pub const READ: SessionPolicy = SessionPolicy { commit: false };

    /// Session that commits on success
    pub const WRITE: SessionPolicy = SessionPolicy { commit: true };
}

/// Handle on the catalog store
#[derive(Debug)]
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open (or create) the store at `path` and ensure its table exists
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening catalog store at {:?}", path);
        let conn = Connection::open(path)?;
        let catalog = Self { conn };
        catalog.create_tables()?;
        Ok(catalog)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let catalog = Self {
            conn: Connection::open_in_memory()?,
        };
        catalog.create_tables()?;
        Ok(catalog)
    }

    /// Create the catalog table if missing
    pub fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Run `f` inside a scoped session
    ///
    /// The transaction is rolled back when `f` fails or the policy does not
    /// commit.
    pub fn session<T>(
        &self,
        policy: SessionPolicy,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(&*tx)?;
        if policy.commit {
            tx.commit()?;
        } else {
            tx.rollback()?;
        }
        Ok(value)
    }
}

/// Catalog repository, stateless; every method takes `&Connection`.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Get one entry by package name.
    pub fn get(conn: &Connection, pkgname: &str) -> Result<Option<CatalogEntry>> {
        let entry = conn
            .query_row(
                "SELECT pkgname, config, is_available, is_installed, files_list
                 FROM packages WHERE pkgname = ?1",
                params![pkgname],
                Self::map_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Insert an entry or replace the existing one with the same name.
    pub fn upsert(conn: &Connection, entry: &CatalogEntry) -> Result<()> {
        let config = serde_json::to_string(&entry.config)?;
        let files_list = serde_json::to_string(&entry.files_list)?;
        conn.execute(
            "INSERT INTO packages (pkgname, config, is_available, is_installed, files_list)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(pkgname) DO UPDATE SET
                config = excluded.config,
                is_available = excluded.is_available,
                is_installed = excluded.is_installed,
                files_list = excluded.files_list",
            params![
                entry.pkgname,
                config,
                entry.is_available,
                entry.is_installed,
                files_list
            ],
        )?;
        Ok(())
    }

    /// List entries matching `filter`, ordered by name.
    pub fn list(conn: &Connection, filter: CatalogFilter) -> Result<Vec<CatalogEntry>> {
        let mut stmt = conn.prepare(
            "SELECT pkgname, config, is_available, is_installed, files_list
             FROM packages
             WHERE (?1 = 0 OR is_installed = 1) AND (?2 = 0 OR is_available = 1)
             ORDER BY pkgname",
        )?;
        let entries = stmt
            .query_map(params![filter.installed, filter.available], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Update the installed flag. Returns `true` if a row changed.
    pub fn set_installed(conn: &Connection, pkgname: &str, installed: bool) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE packages SET is_installed = ?2 WHERE pkgname = ?1",
            params![pkgname, installed],
        )?;
        Ok(changed > 0)
    }

    /// Delete every entry. Returns the number of deleted rows.
    pub fn delete_all(conn: &Connection) -> Result<usize> {
        Ok(conn.execute("DELETE FROM packages", [])?)
    }

    /// Count entries.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM packages", [], |row| row.get(0))?;
        Ok(count)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
        let config: String = row.get(1)?;
        let files_list: String = row.get(4)?;
        Ok(CatalogEntry {
            pkgname: row.get(0)?,
            config: serde_json::from_str(&config)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?,
            is_available: row.get(2)?,
            is_installed: row.get(3)?,
            files_list: serde_json::from_str(&files_list)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
        })
    }
}
