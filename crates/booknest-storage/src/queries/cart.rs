// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cart CRUD operations.
//!
//! The cart-limit and duplicate rules live in the engine; the
//! `(user_id, book_id)` primary key is the storage-level backstop.

use booknest_core::{BooknestError, CartEntry};
use rusqlite::params;

use crate::database::Database;

/// A user's cart entries, oldest first.
pub async fn entries_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<CartEntry>, BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, book_id, added_at FROM cart
                 WHERE user_id = ?1 ORDER BY added_at ASC, book_id ASC",
            )?;
            let rows = stmt.query_map(params![user_id], |row| {
                Ok(CartEntry {
                    user_id: row.get(0)?,
                    book_id: row.get(1)?,
                    added_at: row.get(2)?,
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of entries in a user's cart.
pub async fn count_for_user(db: &Database, user_id: &str) -> Result<i64, BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM cart WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether the user's cart already holds the book.
pub async fn contains(db: &Database, user_id: &str, book_id: i64) -> Result<bool, BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM cart WHERE user_id = ?1 AND book_id = ?2",
                params![user_id, book_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a cart entry.
pub async fn insert_entry(db: &Database, entry: &CartEntry) -> Result<(), BooknestError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO cart (user_id, book_id, added_at) VALUES (?1, ?2, ?3)",
                params![entry.user_id, entry.book_id, entry.added_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove a cart entry. Removing an absent id is a no-op.
pub async fn remove_entry(
    db: &Database,
    user_id: &str,
    book_id: i64,
) -> Result<(), BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM cart WHERE user_id = ?1 AND book_id = ?2",
                params![user_id, book_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Empty a user's cart.
pub async fn clear(db: &Database, user_id: &str) -> Result<(), BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM cart WHERE user_id = ?1", params![user_id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use booknest_core::Book;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        seed_book(&db, 1).await;
        seed_book(&db, 2).await;
        (db, dir)
    }

    async fn seed_book(db: &Database, id: i64) {
        let book = Book {
            id,
            title: format!("Book {id}"),
            author: "Author".to_string(),
            category: "Fiction".to_string(),
            cover_url: String::new(),
            rating: 4.0,
            base_copies: 1,
            isbn: String::new(),
            publisher: String::new(),
            publication_year: 2020,
            page_count: 100,
        };
        crate::queries::catalog::upsert_book(db, &book).await.unwrap();
    }

    #[tokio::test]
    async fn insert_and_list_cart_entries() {
        let (db, _dir) = setup_db().await;

        insert_entry(&db, &CartEntry::new("alice", 1)).await.unwrap();
        insert_entry(&db, &CartEntry::new("alice", 2)).await.unwrap();
        insert_entry(&db, &CartEntry::new("bob", 1)).await.unwrap();

        let entries = entries_for_user(&db, "alice").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(count_for_user(&db, "alice").await.unwrap(), 2);
        assert_eq!(count_for_user(&db, "bob").await.unwrap(), 1);
        assert!(contains(&db, "alice", 1).await.unwrap());
        assert!(!contains(&db, "bob", 2).await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_insert_violates_primary_key() {
        let (db, _dir) = setup_db().await;
        insert_entry(&db, &CartEntry::new("alice", 1)).await.unwrap();
        let err = insert_entry(&db, &CartEntry::new("alice", 1)).await;
        assert!(err.is_err(), "storage backstop should reject duplicates");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn remove_absent_entry_is_noop() {
        let (db, _dir) = setup_db().await;
        remove_entry(&db, "alice", 42).await.unwrap();
        assert_eq!(count_for_user(&db, "alice").await.unwrap(), 0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn clear_empties_only_that_users_cart() {
        let (db, _dir) = setup_db().await;
        insert_entry(&db, &CartEntry::new("alice", 1)).await.unwrap();
        insert_entry(&db, &CartEntry::new("bob", 1)).await.unwrap();

        clear(&db, "alice").await.unwrap();

        assert_eq!(count_for_user(&db, "alice").await.unwrap(), 0);
        assert_eq!(count_for_user(&db, "bob").await.unwrap(), 1);
        db.close().await.unwrap();
    }
}
