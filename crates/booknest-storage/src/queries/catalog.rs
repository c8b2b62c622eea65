// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog queries: books, reviews, and the derived availability aggregate.

use booknest_core::{Book, BookAvailability, BooknestError, Review};
use rusqlite::params;

use crate::database::Database;

const BOOK_COLUMNS: &str = "id, title, author, category, cover_url, rating, base_copies, \
                            isbn, publisher, publication_year, page_count";

fn book_from_row(row: &rusqlite::Row<'_>) -> Result<Book, rusqlite::Error> {
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
}

/// Insert or update a catalog entry. Used only by dataset import.
///
/// Updates in place on conflict so existing loans, cart entries, and
/// bookings keep their foreign-key target.
pub async fn upsert_book(db: &Database, book: &Book) -> Result<(), BooknestError> {
    let book = book.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO books
                 (id, title, author, category, cover_url, rating, base_copies,
                  isbn, publisher, publication_year, page_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(id) DO UPDATE SET
                     title = excluded.title,
                     author = excluded.author,
                     category = excluded.category,
                     cover_url = excluded.cover_url,
                     rating = excluded.rating,
                     base_copies = excluded.base_copies,
                     isbn = excluded.isbn,
                     publisher = excluded.publisher,
                     publication_year = excluded.publication_year,
                     page_count = excluded.page_count",
                params![
                    book.id,
                    book.title,
                    book.author,
                    book.category,
                    book.cover_url,
                    book.rating,
                    book.base_copies,
                    book.isbn,
                    book.publisher,
                    book.publication_year,
                    book.page_count,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a catalog entry by id.
pub async fn get_book(db: &Database, book_id: i64) -> Result<Option<Book>, BooknestError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"))?;
            let result = stmt.query_row(params![book_id], book_from_row);
            match result {
                Ok(book) => Ok(Some(book)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All books with derived availability, ordered by title.
///
/// `copies_available = base_copies - COUNT(active loans)` in one aggregate
/// pass over `idx_loans_book_status`; the per-partition scan of the original
/// design collapses into this query.
pub async fn list_books(db: &Database) -> Result<Vec<BookAvailability>, BooknestError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT b.id, b.title, b.author, b.category, b.cover_url, b.rating,
                        b.base_copies, b.isbn, b.publisher, b.publication_year, b.page_count,
                        COUNT(l.reservation_id) AS active_loans
                 FROM books b
                 LEFT JOIN loans l ON l.book_id = b.id AND l.status = 'borrowed'
                 GROUP BY b.id
                 ORDER BY b.title ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                let book = book_from_row(row)?;
                let active_loans: i64 = row.get(11)?;
                Ok(BookAvailability::derive(book, active_loans))
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

/// Derived availability for a single book.
pub async fn get_availability(
    db: &Database,
    book_id: i64,
) -> Result<Option<BookAvailability>, BooknestError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT b.id, b.title, b.author, b.category, b.cover_url, b.rating,
                        b.base_copies, b.isbn, b.publisher, b.publication_year, b.page_count,
                        COUNT(l.reservation_id) AS active_loans
                 FROM books b
                 LEFT JOIN loans l ON l.book_id = b.id AND l.status = 'borrowed'
                 WHERE b.id = ?1
                 GROUP BY b.id",
            )?;
            let result = stmt.query_row(params![book_id], |row| {
                let book = book_from_row(row)?;
                let active_loans: i64 = row.get(11)?;
                Ok(BookAvailability::derive(book, active_loans))
            });
            match result {
                Ok(avail) => Ok(Some(avail)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Replace the reviews attached to a book. Used only by dataset import.
pub async fn replace_reviews(
    db: &Database,
    book_id: i64,
    reviews: &[Review],
) -> Result<(), BooknestError> {
    let reviews = reviews.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM reviews WHERE book_id = ?1", params![book_id])?;
            for review in &reviews {
                tx.execute(
                    "INSERT INTO reviews (book_id, reviewer, rating, comment, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        book_id,
                        review.reviewer,
                        review.rating,
                        review.comment,
                        review.created_at,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Reviews for a book, oldest first.
pub async fn reviews_for_book(db: &Database, book_id: i64) -> Result<Vec<Review>, BooknestError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT book_id, reviewer, rating, comment, created_at
                 FROM reviews WHERE book_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![book_id], |row| {
                Ok(Review {
                    book_id: row.get(0)?,
                    reviewer: row.get(1)?,
                    rating: row.get(2)?,
                    comment: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut reviews = Vec::new();
            for row in rows {
                reviews.push(row?);
            }
            Ok(reviews)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use booknest_core::BookStatus;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_book(id: i64, title: &str, copies: i64) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: "Author".to_string(),
            category: "Fiction".to_string(),
            cover_url: String::new(),
            rating: 4.0,
            base_copies: copies,
            isbn: format!("isbn-{id}"),
            publisher: "Publisher".to_string(),
            publication_year: 2020,
            page_count: 300,
        }
    }

    #[tokio::test]
    async fn upsert_and_get_book_roundtrips() {
        let (db, _dir) = setup_db().await;
        let book = make_book(1, "Dune", 2);

        upsert_book(&db, &book).await.unwrap();
        let retrieved = get_book(&db, 1).await.unwrap().unwrap();
        assert_eq!(retrieved, book);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_book_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_book(&db, 999).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_replaces_existing_entry() {
        let (db, _dir) = setup_db().await;
        upsert_book(&db, &make_book(1, "Old Title", 1)).await.unwrap();
        upsert_book(&db, &make_book(1, "New Title", 3)).await.unwrap();

        let book = get_book(&db, 1).await.unwrap().unwrap();
        assert_eq!(book.title, "New Title");
        assert_eq!(book.base_copies, 3);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_books_orders_by_title_with_full_availability() {
        let (db, _dir) = setup_db().await;
        upsert_book(&db, &make_book(1, "Zen", 1)).await.unwrap();
        upsert_book(&db, &make_book(2, "AbC", 2)).await.unwrap();

        let books = list_books(&db).await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].book.title, "AbC");
        assert_eq!(books[0].copies_available, 2);
        assert_eq!(books[0].status, BookStatus::Available);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn availability_counts_only_borrowed_loans() {
        let (db, _dir) = setup_db().await;
        upsert_book(&db, &make_book(1, "Dune", 1)).await.unwrap();

        // One active, one returned loan against the single copy.
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO loans (reservation_id, user_id, book_id, book_title,
                     book_author, borrow_date, due_date, duration_days, status)
                     VALUES ('r1', 'alice', 1, 'Dune', 'A', '2026-01-01T00:00:00.000Z',
                             '2026-01-08T00:00:00.000Z', 7, 'borrowed')",
                    [],
                )?;
                conn.execute(
                    "INSERT INTO loans (reservation_id, user_id, book_id, book_title,
                     book_author, borrow_date, due_date, duration_days, status, return_date)
                     VALUES ('r2', 'bob', 1, 'Dune', 'A', '2026-01-01T00:00:00.000Z',
                             '2026-01-08T00:00:00.000Z', 7, 'returned', '2026-01-05T00:00:00.000Z')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let avail = get_availability(&db, 1).await.unwrap().unwrap();
        assert_eq!(avail.copies_available, 0);
        assert_eq!(avail.status, BookStatus::Borrowed);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn replace_reviews_swaps_the_full_set() {
        let (db, _dir) = setup_db().await;
        upsert_book(&db, &make_book(1, "Dune", 1)).await.unwrap();

        let first = vec![Review {
            book_id: 1,
            reviewer: "alice".to_string(),
            rating: 5.0,
            comment: "great".to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }];
        replace_reviews(&db, 1, &first).await.unwrap();

        let second = vec![
            Review {
                book_id: 1,
                reviewer: "bob".to_string(),
                rating: 3.0,
                comment: "fine".to_string(),
                created_at: "2026-01-02T00:00:00.000Z".to_string(),
            },
            Review {
                book_id: 1,
                reviewer: "carol".to_string(),
                rating: 4.0,
                comment: "good".to_string(),
                created_at: "2026-01-03T00:00:00.000Z".to_string(),
            },
        ];
        replace_reviews(&db, 1, &second).await.unwrap();

        let reviews = reviews_for_book(&db, 1).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].reviewer, "bob");
        assert_eq!(reviews[1].reviewer, "carol");

        db.close().await.unwrap();
    }
}
