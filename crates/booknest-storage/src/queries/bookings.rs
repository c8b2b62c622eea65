// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Future booking operations.
//!
//! Bookings are global rows, not per-user partitions: the extension-blocking
//! rule needs to see every user's claims in one query.

use booknest_core::{BooknestError, FutureBooking};
use rusqlite::params;

use crate::database::Database;

const BOOKING_COLUMNS: &str =
    "booking_id, book_id, user_id, booking_date, expected_return_date, holder_reservation_id";

fn booking_from_row(row: &rusqlite::Row<'_>) -> Result<FutureBooking, rusqlite::Error> {
    Ok(FutureBooking {
        booking_id: row.get(0)?,
        book_id: row.get(1)?,
        user_id: row.get(2)?,
        booking_date: row.get(3)?,
        expected_return_date: row.get(4)?,
        holder_reservation_id: row.get(5)?,
    })
}

/// Insert a new future booking.
pub async fn insert_booking(db: &Database, booking: &FutureBooking) -> Result<(), BooknestError> {
    let booking = booking.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bookings
                 (booking_id, book_id, user_id, booking_date, expected_return_date,
                  holder_reservation_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    booking.booking_id,
                    booking.book_id,
                    booking.user_id,
                    booking.booking_date,
                    booking.expected_return_date,
                    booking.holder_reservation_id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a booking by id.
pub async fn get_booking(
    db: &Database,
    booking_id: &str,
) -> Result<Option<FutureBooking>, BooknestError> {
    let booking_id = booking_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = ?1"
            ))?;
            let result = stmt.query_row(params![booking_id], booking_from_row);
            match result {
                Ok(booking) => Ok(Some(booking)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// A user's booking for one book, if any.
pub async fn for_user_book(
    db: &Database,
    user_id: &str,
    book_id: i64,
) -> Result<Option<FutureBooking>, BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ?1 AND book_id = ?2"
            ))?;
            let result = stmt.query_row(params![user_id, book_id], booking_from_row);
            match result {
                Ok(booking) => Ok(Some(booking)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether any booking blocks an extension of the given loan: a claim on
/// this reservation id, or on the same book from a different user.
pub async fn has_blocking_booking(
    db: &Database,
    reservation_id: &str,
    book_id: i64,
    holder_user_id: &str,
) -> Result<bool, BooknestError> {
    let reservation_id = reservation_id.to_string();
    let holder_user_id = holder_user_id.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM bookings
                 WHERE holder_reservation_id = ?1
                    OR (book_id = ?2 AND user_id <> ?3)",
                params![reservation_id, book_id, holder_user_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// A user's bookings, oldest first.
pub async fn list_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<FutureBooking>, BooknestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings
                 WHERE user_id = ?1 ORDER BY booking_date ASC"
            ))?;
            let rows = stmt.query_map(params![user_id], booking_from_row)?;
            let mut bookings = Vec::new();
            for row in rows {
                bookings.push(row?);
            }
            Ok(bookings)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a booking. Returns `false` when no booking with that id existed.
pub async fn delete(db: &Database, booking_id: &str) -> Result<bool, BooknestError> {
    let booking_id = booking_id.to_string();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM bookings WHERE booking_id = ?1",
                params![booking_id],
            )?;
            Ok(removed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
