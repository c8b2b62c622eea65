// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread: `Database` wraps the one `tokio_rusqlite::Connection`, every
//! query function accepts `&Database` and calls through `connection().call()`.
//! Do NOT create additional Connection instances for writes.

use booknest_core::BooknestError;
use tracing::debug;

/// Handle to the BookNest SQLite database.
///
/// Opening runs PRAGMA setup and all pending refinery migrations before the
/// async connection is handed out.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled.
    pub async fn open(path: &str) -> Result<Self, BooknestError> {
        Self::open_with_options(path, true).await
    }

    /// Open (or create) the database at `path`.
    ///
    /// PRAGMAs and migrations run on a blocking rusqlite connection before
    /// the tokio-rusqlite handle opens, so the refinery error type never
    /// crosses the `call` boundary.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, BooknestError> {
        let setup_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), BooknestError> {
            let mut conn = rusqlite::Connection::open(&setup_path).map_err(map_sql_err)?;
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(map_sql_err)?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")
                .map_err(map_sql_err)?;
            conn.pragma_update(None, "busy_timeout", 5000)
                .map_err(map_sql_err)?;
            crate::migrations::run_migrations(&mut conn)?;
            Ok(())
        })
        .await
        .map_err(|e| BooknestError::Internal(format!("database setup task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_sql_err)?;

        // Foreign keys are per-connection, not persisted in the file.
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection (the single writer).
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is current.
    pub async fn close(&self) -> Result<(), BooknestError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert a tokio-rusqlite error into `BooknestError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> BooknestError {
    BooknestError::Storage {
        source: Box::new(e),
    }
}

pub(crate) fn map_sql_err(e: rusqlite::Error) -> BooknestError {
    BooknestError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_database_file_and_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("open_test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists(), "database file should be created");

        // Schema from V1 migration is present.
        let count: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                     AND name IN ('books', 'cart', 'loans', 'bookings', 'wishlist', 'reviews')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(count, 6);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen_test.db");
        {
            let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
            db.close().await.unwrap();
        }
        // Second open must not re-run migrations destructively.
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
    }
}
