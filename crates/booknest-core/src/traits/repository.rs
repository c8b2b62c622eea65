// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository trait for reservation persistence backends.

use async_trait::async_trait;

use crate::error::BooknestError;
use crate::loan::{Loan, LoanStatusFilter};
use crate::types::{Book, BookAvailability, CartEntry, FutureBooking, Review, WishlistEntry};

/// Persistence seam for the reservation engine.
///
/// The engine owns every lending rule; implementations own durability and
/// the derived-availability aggregate. All mutations must be atomic per
/// call: a failed write leaves no partial state behind.
#[async_trait]
pub trait ReservationRepository: Send + Sync + 'static {
    // --- Catalog ---

    /// Insert or replace a catalog entry (dataset import only).
    async fn upsert_book(&self, book: &Book) -> Result<(), BooknestError>;

    /// Replace the reviews attached to a book (dataset import only).
    async fn replace_reviews(&self, book_id: i64, reviews: &[Review])
        -> Result<(), BooknestError>;

    async fn get_book(&self, book_id: i64) -> Result<Option<Book>, BooknestError>;

    /// All books with derived availability, ordered by title.
    async fn list_books(&self) -> Result<Vec<BookAvailability>, BooknestError>;

    /// Derived availability for one book, or `None` if it is not in the
    /// catalog.
    async fn get_availability(&self, book_id: i64)
        -> Result<Option<BookAvailability>, BooknestError>;

    async fn reviews_for_book(&self, book_id: i64) -> Result<Vec<Review>, BooknestError>;

    // --- Cart ---

    async fn cart_entries(&self, user_id: &str) -> Result<Vec<CartEntry>, BooknestError>;

    async fn cart_count(&self, user_id: &str) -> Result<i64, BooknestError>;

    async fn cart_contains(&self, user_id: &str, book_id: i64) -> Result<bool, BooknestError>;

    async fn add_cart_entry(&self, entry: &CartEntry) -> Result<(), BooknestError>;

    /// Removing an id that is not in the cart is a no-op.
    async fn remove_cart_entry(&self, user_id: &str, book_id: i64) -> Result<(), BooknestError>;

    async fn clear_cart(&self, user_id: &str) -> Result<(), BooknestError>;

    // --- Loans ---

    async fn insert_loan(&self, loan: &Loan) -> Result<(), BooknestError>;

    async fn get_loan(&self, reservation_id: &str) -> Result<Option<Loan>, BooknestError>;

    /// Persist the full current state of a loan (post-transition).
    async fn update_loan(&self, loan: &Loan) -> Result<(), BooknestError>;

    /// A user's history, newest first, optionally filtered by state.
    async fn loans_for_user(
        &self,
        user_id: &str,
        filter: Option<LoanStatusFilter>,
    ) -> Result<Vec<Loan>, BooknestError>;

    /// Active (borrowed) loans for a book across all users, earliest due
    /// date first.
    async fn active_loans_for_book(&self, book_id: i64) -> Result<Vec<Loan>, BooknestError>;

    async fn active_loan_count(&self, user_id: &str) -> Result<i64, BooknestError>;

    /// Delete a user's entire history. Returns the number of records removed.
    async fn clear_history(&self, user_id: &str) -> Result<u64, BooknestError>;

    // --- Future bookings ---

    async fn insert_booking(&self, booking: &FutureBooking) -> Result<(), BooknestError>;

    async fn get_booking(&self, booking_id: &str)
        -> Result<Option<FutureBooking>, BooknestError>;

    async fn booking_for_user_book(
        &self,
        user_id: &str,
        book_id: i64,
    ) -> Result<Option<FutureBooking>, BooknestError>;

    /// True when any booking targets this reservation id, or the same book
    /// id from a different user. Feeds the extension-blocking rule.
    async fn has_blocking_booking(
        &self,
        reservation_id: &str,
        book_id: i64,
        holder_user_id: &str,
    ) -> Result<bool, BooknestError>;

    async fn bookings_for_user(&self, user_id: &str)
        -> Result<Vec<FutureBooking>, BooknestError>;

    /// Returns `false` when no booking with that id existed.
    async fn delete_booking(&self, booking_id: &str) -> Result<bool, BooknestError>;

    // --- Wishlist ---

    /// Adding a book already on the wishlist is a no-op.
    async fn wishlist_add(&self, entry: &WishlistEntry) -> Result<(), BooknestError>;

    async fn wishlist_remove(&self, user_id: &str, book_id: i64) -> Result<(), BooknestError>;

    async fn wishlist_books(&self, user_id: &str) -> Result<Vec<Book>, BooknestError>;
}
