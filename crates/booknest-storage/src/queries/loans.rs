// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loan CRUD operations.
//!
//! The tagged `LoanState` is flattened into the `status`/flag/date columns
//! on write and reassembled on read; `status` stays a plain TEXT column so
//! the availability aggregate and history filters can index it.

use booknest_core::{BooknestError, Loan, LoanState, LoanStatusFilter};
use rusqlite::params;

use crate::database::Database;

const LOAN_COLUMNS: &str = "reservation_id, user_id, book_id, book_title, book_author, \
                            borrow_date, due_date, duration_days, status, extended, \
                            picked_up, return_date, cancel_date, pickup_date, extension_date";

fn loan_from_row(row: &rusqlite::Row<'_>) -> Result<Loan, rusqlite::Error> {
    let status: String = row.get(8)?;
    let state = match status.as_str() {
        "borrowed" => LoanState::Borrowed {
            extended: row.get(9)?,
            picked_up: row.get(10)?,
            pickup_date: row.get(13)?,
            extension_date: row.get(14)?,
        },
        "returned" => LoanState::Returned {
            return_date: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
        },
        "cancelled" => LoanState::Cancelled {
            cancel_date: row.get::<_, Option<String>>(12)?.unwrap_or_default(),
        },
        other => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                8,
                rusqlite::types::Type::Text,
                format!("unknown loan status `{other}`").into(),
            ));
        }
    };
    Ok(Loan {
        reservation_id: row.get(0)?,
        user_id: row.get(1)?,
        book_id: row.get(2)?,
        book_title: row.get(3)?,
        book_author: row.get(4)?,
        borrow_date: row.get(5)?,
        due_date: row.get(6)?,
        duration_days: row.get(7)?,
        state,
    })
}

/// Column values derived from a `LoanState` for INSERT/UPDATE binding.
struct StateColumns {
    extended: bool,
    picked_up: bool,
    return_date: Option<String>,
    cancel_date: Option<String>,
    pickup_date: Option<String>,
    extension_date: Option<String>,
}

fn state_columns(state: &LoanState) -> StateColumns {
    match state {
        LoanState::Borrowed {
            extended,
            picked_up,
            pickup_date,
            extension_date,
        } => StateColumns {
            extended: *extended,
            picked_up: *picked_up,
            return_date: None,
            cancel_date: None,
            pickup_date: pickup_date.clone(),
            extension_date: extension_date.clone(),
        },
        LoanState::Returned { return_date } => StateColumns {
            extended: false,
            picked_up: false,
            return_date: Some(return_date.clone()),
            cancel_date: None,
            pickup_date: None,
            extension_date: None,
        },
        LoanState::Cancelled { cancel_date } => StateColumns {
            extended: false,
            picked_up: false,
            return_date: None,
            cancel_date: Some(cancel_date.clone()),
            pickup_date: None,
            extension_date: None,
        },
    }
}

/// Insert a new loan record.
pub async fn insert_loan(db: &Database, loan: &Loan) -> Result<(), BooknestError> {
    let loan = loan.clone();
    db.connection()
        .call(move |conn| {
            let cols = state_columns(&loan.state);
            conn.execute(
                "INSERT INTO loans
                 (reservation_id, user_id, book_id, book_title, book_author, borrow_date,
                  due_date, duration_days, status, extended, picked_up, return_date,
                  cancel_date, pickup_date, extension_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    loan.reservation_id,
                    loan.user_id,
                    loan.book_id,
                    loan.book_title,
                    loan.book_author,
                    loan.borrow_date,
                    loan.due_date,
                    loan.duration_days,
                    loan.state.label(),
                    cols.extended,
                    cols.picked_up,
                    cols.return_date,
                    cols.cancel_date,
                    cols.pickup_date,
                    cols.extension_date,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a loan by reservation id.
pub async fn get_loan(db: &Database, reservation_id: &str) -> Result<Option<Loan>, BooknestError> {
    let reservation_id = reservation_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LOAN_COLUMNS} FROM loans WHERE reservation_id = ?1"
            ))?;
            let result = stmt.query_row(params![reservation_id], loan_from_row);
            match result {
                Ok(loan) => Ok(Some(loan)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Persist the full current state of a loan (post-transition).
pub async fn update_loan(db: &Database, loan: &Loan) -> Result<(), BooknestError> {
    let loan = loan.clone();
    db.connection()
        .call(move |conn| {
            let cols = state_columns(&loan.state);
            conn.execute(
                "UPDATE loans SET due_date = ?1, status = ?2, extended = ?3, picked_up = ?4,
                 return_date = ?5, cancel_date = ?6, pickup_date = ?7, extension_date = ?8
                 WHERE reservation_id = ?9",
                params![
                    loan.due_date,
                    loan.state.label(),
                    cols.extended,
                    cols.picked_up,
                    cols.return_date,
                    cols.cancel_date,
                    cols.pickup_date,
                    cols.extension_date,
                    loan.reservation_id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// A user's history, newest first, optionally filtered by state.
pub async fn loans_for_user(
    db: &Database,
    user_id: &str,
    filter: Option<LoanStatusFilter>,
) -> Result<Vec<Loan>, BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut loans = Vec::new();
            match filter {
                Some(status) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {LOAN_COLUMNS} FROM loans
                         WHERE user_id = ?1 AND status = ?2
                         ORDER BY borrow_date DESC"
                    ))?;
                    let rows =
                        stmt.query_map(params![user_id, status.to_string()], loan_from_row)?;
                    for row in rows {
                        loans.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {LOAN_COLUMNS} FROM loans
                         WHERE user_id = ?1 ORDER BY borrow_date DESC"
                    ))?;
                    let rows = stmt.query_map(params![user_id], loan_from_row)?;
                    for row in rows {
                        loans.push(row?);
                    }
                }
            }
            Ok(loans)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Active loans for a book across all users, earliest due date first.
pub async fn active_loans_for_book(
    db: &Database,
    book_id: i64,
) -> Result<Vec<Loan>, BooknestError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LOAN_COLUMNS} FROM loans
                 WHERE book_id = ?1 AND status = 'borrowed'
                 ORDER BY due_date ASC"
            ))?;
            let rows = stmt.query_map(params![book_id], loan_from_row)?;
            let mut loans = Vec::new();
            for row in rows {
                loans.push(row?);
            }
            Ok(loans)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of active loans held by a user.
pub async fn active_loan_count(db: &Database, user_id: &str) -> Result<i64, BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM loans WHERE user_id = ?1 AND status = 'borrowed'",
                params![user_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a user's entire history. Returns the number of records removed.
pub async fn clear_history(db: &Database, user_id: &str) -> Result<u64, BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute("DELETE FROM loans WHERE user_id = ?1", params![user_id])?;
            Ok(removed as u64)
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
        crate::queries::catalog::upsert_book(&db, &make_book(1)).await.unwrap();
        (db, dir)
    }

    fn make_book(id: i64) -> Book {
        Book {
            id,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            category: "Science Fiction".to_string(),
            cover_url: String::new(),
            rating: 4.5,
            base_copies: 2,
            isbn: String::new(),
            publisher: String::new(),
            publication_year: 1965,
            page_count: 412,
        }
    }

    #[tokio::test]
    async fn insert_and_get_loan_roundtrips() {
        let (db, _dir) = setup_db().await;
        let loan = Loan::new("alice", &make_book(1), 14);

        insert_loan(&db, &loan).await.unwrap();
        let retrieved = get_loan(&db, &loan.reservation_id).await.unwrap().unwrap();
        assert_eq!(retrieved, loan);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_loan_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_loan(&db, "no-such-id").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_persists_state_transitions() {
        let (db, _dir) = setup_db().await;
        let mut loan = Loan::new("alice", &make_book(1), 7);
        insert_loan(&db, &loan).await.unwrap();

        loan.mark_picked_up().unwrap();
        loan.extend(7).unwrap();
        update_loan(&db, &loan).await.unwrap();

        let retrieved = get_loan(&db, &loan.reservation_id).await.unwrap().unwrap();
        assert_eq!(retrieved, loan);
        assert!(matches!(
            retrieved.state,
            LoanState::Borrowed {
                extended: true,
                picked_up: true,
                ..
            }
        ));

        loan.mark_returned().unwrap();
        update_loan(&db, &loan).await.unwrap();
        let retrieved = get_loan(&db, &loan.reservation_id).await.unwrap().unwrap();
        assert!(matches!(retrieved.state, LoanState::Returned { .. }));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn history_filter_selects_by_status() {
        let (db, _dir) = setup_db().await;
        let active = Loan::new("alice", &make_book(1), 7);
        let mut returned = Loan::new("alice", &make_book(1), 7);
        returned.mark_returned().unwrap();
        let other_user = Loan::new("bob", &make_book(1), 7);

        insert_loan(&db, &active).await.unwrap();
        insert_loan(&db, &returned).await.unwrap();
        insert_loan(&db, &other_user).await.unwrap();

        let all = loans_for_user(&db, "alice", None).await.unwrap();
        assert_eq!(all.len(), 2);

        let borrowed = loans_for_user(&db, "alice", Some(LoanStatusFilter::Borrowed))
            .await
            .unwrap();
        assert_eq!(borrowed.len(), 1);
        assert_eq!(borrowed[0].reservation_id, active.reservation_id);

        let cancelled = loans_for_user(&db, "alice", Some(LoanStatusFilter::Cancelled))
            .await
            .unwrap();
        assert!(cancelled.is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn active_loans_for_book_skips_closed_records() {
        let (db, _dir) = setup_db().await;
        let active = Loan::new("alice", &make_book(1), 7);
        let mut cancelled = Loan::new("bob", &make_book(1), 7);
        cancelled.cancel().unwrap();

        insert_loan(&db, &active).await.unwrap();
        insert_loan(&db, &cancelled).await.unwrap();

        let loans = active_loans_for_book(&db, 1).await.unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].reservation_id, active.reservation_id);

        assert_eq!(active_loan_count(&db, "alice").await.unwrap(), 1);
        assert_eq!(active_loan_count(&db, "bob").await.unwrap(), 0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn clear_history_removes_only_that_user() {
        let (db, _dir) = setup_db().await;
        insert_loan(&db, &Loan::new("alice", &make_book(1), 7)).await.unwrap();
        insert_loan(&db, &Loan::new("alice", &make_book(1), 7)).await.unwrap();
        insert_loan(&db, &Loan::new("bob", &make_book(1), 7)).await.unwrap();

        let removed = clear_history(&db, "alice").await.unwrap();
        assert_eq!(removed, 2);
        assert!(loans_for_user(&db, "alice", None).await.unwrap().is_empty());
        assert_eq!(loans_for_user(&db, "bob", None).await.unwrap().len(), 1);

        db.close().await.unwrap();
    }
}
