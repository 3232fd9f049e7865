//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The sync loop calls store methods; it never executes SQL directly.

use crate::error::{SyncError, SyncResult};
use rusqlite::{Connection, DatabaseName, ErrorCode, OpenFlags, Transaction};
use std::path::Path;

mod customer;
mod revenue;
mod run;
mod sale;

pub use run::SyncRunRow;

pub struct SalesStore {
    conn: Connection,
}

impl SalesStore {
    /// Open an existing database. A missing file or a permission failure is
    /// reported as `DatabaseMissing` / `AccessDenied` instead of a raw SQLite error.
    pub fn open(path: &str) -> SyncResult<Self> {
        if !path.starts_with("file:") && !Path::new(path).exists() {
            return Err(SyncError::DatabaseMissing {
                path: path.to_string(),
            });
        }
        Self::connect(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI,
        )
    }

    /// Open the database at `path`, creating the file if needed.
    pub fn open_or_create(path: &str) -> SyncResult<Self> {
        Self::connect(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SyncResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    fn connect(path: &str, flags: OpenFlags) -> SyncResult<Self> {
        let opened = Connection::open_with_flags(path, flags).and_then(|conn| {
            // SQLite opens lazily; the first statement surfaces permission problems.
            conn.execute_batch("PRAGMA foreign_keys=ON;")?;
            Ok(conn)
        });
        let conn = opened.map_err(|err| classify_open_error(path, err))?;
        // An unwritable file still opens, read-only; writes would fail mid-sync.
        if conn.is_readonly(DatabaseName::Main)? {
            return Err(SyncError::AccessDenied {
                path: path.to_string(),
            });
        }
        Ok(Self { conn })
    }

    /// Apply the schema. Safe to run against an already-populated database.
    pub fn migrate(&self) -> SyncResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_sales_ledger.sql"))?;
        Ok(())
    }

    /// Begin the single transaction every sync write goes through.
    /// Dropping the returned handle without `commit` discards all writes.
    pub fn transaction(&mut self) -> SyncResult<StoreTx<'_>> {
        Ok(StoreTx {
            tx: self.conn.transaction()?,
        })
    }
}

/// Write handle for one sync run.
pub struct StoreTx<'a> {
    tx: Transaction<'a>,
}

impl StoreTx<'_> {
    pub fn commit(self) -> SyncResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> SyncResult<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

fn classify_open_error(path: &str, err: rusqlite::Error) -> SyncError {
    match err.sqlite_error_code() {
        Some(ErrorCode::PermissionDenied)
        | Some(ErrorCode::ReadOnly)
        | Some(ErrorCode::AuthorizationForStatementDenied) => SyncError::AccessDenied {
            path: path.to_string(),
        },
        Some(ErrorCode::CannotOpen) if Path::new(path).exists() => SyncError::AccessDenied {
            path: path.to_string(),
        },
        Some(ErrorCode::CannotOpen) => SyncError::DatabaseMissing {
            path: path.to_string(),
        },
        _ => SyncError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported_as_missing_database() {
        let err = SalesStore::open("/nonexistent-dir/sales.db")
            .err()
            .expect("open should fail");
        assert!(
            matches!(err, SyncError::DatabaseMissing { .. }),
            "unexpected error: {err}"
        );
    }

    fn temp_db(name: &str) -> String {
        let path = std::env::temp_dir().join(format!("sheetsync-{}-{name}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn created_database_can_be_reopened() {
        let path = temp_db("reopen");
        {
            let store = SalesStore::open_or_create(&path).unwrap();
            store.migrate().unwrap();
        }

        let store = SalesStore::open(&path).expect("reopen existing database");
        assert_eq!(store.customer_count().unwrap(), 0);

        drop(store);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn read_only_database_is_reported_as_access_denied() {
        let path = temp_db("readonly");
        {
            let store = SalesStore::open_or_create(&path).unwrap();
            store.migrate().unwrap();
        }

        let err = SalesStore::open(&format!("file:{path}?mode=ro"))
            .err()
            .expect("read-only open should be refused");
        assert!(
            matches!(err, SyncError::AccessDenied { .. }),
            "unexpected error: {err}"
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn migrate_is_idempotent() {
        let store = SalesStore::in_memory().unwrap();
        store.migrate().unwrap();
        store.migrate().unwrap();
        assert_eq!(store.customer_count().unwrap(), 0);
    }
}
