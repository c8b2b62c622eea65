// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wishlist operations.

use booknest_core::{Book, BooknestError, WishlistEntry};
use rusqlite::params;

use crate::database::Database;

/// Add a book to a user's wishlist. Adding a duplicate is a no-op.
pub async fn add(db: &Database, entry: &WishlistEntry) -> Result<(), BooknestError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO wishlist (user_id, book_id, added_at)
                 VALUES (?1, ?2, ?3)",
                params![entry.user_id, entry.book_id, entry.added_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Remove a book from a user's wishlist. Removing an absent id is a no-op.
pub async fn remove(db: &Database, user_id: &str, book_id: i64) -> Result<(), BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM wishlist WHERE user_id = ?1 AND book_id = ?2",
                params![user_id, book_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The books on a user's wishlist, in the order they were added.
pub async fn books_for_user(db: &Database, user_id: &str) -> Result<Vec<Book>, BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT b.id, b.title, b.author, b.category, b.cover_url, b.rating,
                        b.base_copies, b.isbn, b.publisher, b.publication_year, b.page_count
                 FROM wishlist w
                 JOIN books b ON b.id = w.book_id
                 WHERE w.user_id = ?1
                 ORDER BY w.added_at ASC, b.id ASC",
            )?;
            let rows = stmt.query_map(params![user_id], |row| {
                Ok(Book {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    author: row.get(2)?,
                    category: row.get(3)?,
                    cover_url: row.get(4)?,
                    rating: row.get(5)?,
                    base_copies: row.get(6)?,
                    isbn: row.get(7)?,
                    publisher: row.get(8)?,
                    publication_year: row.get(9)?,
                    page_count: row.get(10)?,
                })
            })?;
            let mut books = Vec::new();
            for row in rows {
                books.push(row?);
            }
            Ok(books)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
