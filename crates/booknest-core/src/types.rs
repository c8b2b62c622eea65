// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the BookNest repository trait and engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Timestamp format used for every persisted date field (ISO 8601 UTC,
/// millisecond precision). Matches SQLite's `strftime('%Y-%m-%dT%H:%M:%fZ')`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Current UTC time formatted as [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// A catalog entry. Books are loaded from a static dataset and never
/// created or deleted by reservation operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique catalog id.
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: String,
    pub cover_url: String,
    /// Average rating, 0.0 to 5.0.
    pub rating: f64,
    /// Total copies the library owns. Availability is derived from this,
    /// never stored.
    pub base_copies: i64,
    pub isbn: String,
    pub publisher: String,
    pub publication_year: i64,
    pub page_count: i64,
}

/// A reader review attached to a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub book_id: i64,
    pub reviewer: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: String,
}

/// Derived stock status of a book.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Borrowed,
}

/// A catalog entry together with its derived availability.
///
/// `copies_available = base_copies - active loans across ALL users`, computed
/// by a single aggregate query at read time. The status is a pure function of
/// that count and is never written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookAvailability {
    pub book: Book,
    pub copies_available: i64,
    pub status: BookStatus,
}

impl BookAvailability {
    /// Derive availability from a book and its count of active loans.
    pub fn derive(book: Book, active_loans: i64) -> Self {
        let copies_available = (book.base_copies - active_loans).max(0);
        let status = if copies_available > 0 {
            BookStatus::Available
        } else {
            BookStatus::Borrowed
        };
        Self {
            book,
            copies_available,
            status,
        }
    }
}

/// A pending, unconfirmed selection in a user's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub user_id: String,
    pub book_id: i64,
    pub added_at: String,
}

impl CartEntry {
    pub fn new(user_id: impl Into<String>, book_id: i64) -> Self {
        Self {
            user_id: user_id.into(),
            book_id,
            added_at: now_timestamp(),
        }
    }
}

/// A claim on a book currently held by another borrower.
///
/// Bookings are global (not per-user) because they feed extension blocking
/// for all users. They are removed only by explicit cancellation; there is
/// no expiry sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureBooking {
    /// Unique booking token (UUID v4).
    pub booking_id: String,
    pub book_id: i64,
    pub user_id: String,
    pub booking_date: String,
    /// Due date of the current borrower's loan when one was active at
    /// booking time, otherwise a 7-day default from the booking date.
    pub expected_return_date: String,
    /// Reservation id of the borrower holding the book at booking time.
    pub holder_reservation_id: Option<String>,
}

impl FutureBooking {
    pub fn new(
        user_id: impl Into<String>,
        book_id: i64,
        expected_return_date: String,
        holder_reservation_id: Option<String>,
    ) -> Self {
        Self {
            booking_id: uuid::Uuid::new_v4().to_string(),
            book_id,
            user_id: user_id.into(),
            booking_date: now_timestamp(),
            expected_return_date,
            holder_reservation_id,
        }
    }
}

/// A saved-for-later wishlist entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub user_id: String,
    pub book_id: i64,
    pub added_at: String,
}

impl WishlistEntry {
    pub fn new(user_id: impl Into<String>, book_id: i64) -> Self {
        Self {
            user_id: user_id.into(),
            book_id,
            added_at: now_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(base_copies: i64) -> Book {
        Book {
            id: 1,
            title: "The Rust Programming Language".to_string(),
            author: "Steve Klabnik".to_string(),
            category: "Programming".to_string(),
            cover_url: String::new(),
            rating: 4.8,
            base_copies,
            isbn: "978-1718503106".to_string(),
            publisher: "No Starch Press".to_string(),
            publication_year: 2023,
            page_count: 560,
        }
    }

    #[test]
    fn availability_with_free_copies_is_available() {
        let avail = BookAvailability::derive(book(2), 1);
        assert_eq!(avail.copies_available, 1);
        assert_eq!(avail.status, BookStatus::Available);
    }

    #[test]
    fn availability_with_all_copies_on_loan_is_borrowed() {
        let avail = BookAvailability::derive(book(1), 1);
        assert_eq!(avail.copies_available, 0);
        assert_eq!(avail.status, BookStatus::Borrowed);
    }

    #[test]
    fn availability_never_goes_negative() {
        // More active loans than base copies can appear transiently when the
        // catalog is re-imported with a lower copy count.
        let avail = BookAvailability::derive(book(1), 3);
        assert_eq!(avail.copies_available, 0);
        assert_eq!(avail.status, BookStatus::Borrowed);
    }

    #[test]
    fn book_status_parses_lowercase() {
        use std::str::FromStr;
        assert_eq!(BookStatus::from_str("available").unwrap(), BookStatus::Available);
        assert_eq!(BookStatus::from_str("borrowed").unwrap(), BookStatus::Borrowed);
        assert_eq!(BookStatus::Available.to_string(), "available");
    }

    #[test]
    fn timestamp_format_parses_back() {
        let ts = now_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
