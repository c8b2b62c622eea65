// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reservation engine: lending rules over the repository.
//!
//! Every mutation goes through here. The engine checks cart limits,
//! duplicate entries, availability, and booking conflicts, then persists
//! through the repository trait. Loan lifecycle transitions live on
//! [`Loan`] itself; the engine loads, transitions, and writes back.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};

use booknest_config::model::LendingConfig;
use booknest_core::types::TIMESTAMP_FORMAT;
use booknest_core::{
    Book, BookAvailability, BookStatus, BooknestError, CartEntry, FutureBooking, Loan, LoanState,
    LoanStatusFilter, ReservationRepository, WishlistEntry,
};

/// Business-rule layer of the reservation store.
///
/// Holds the repository behind an `Arc<dyn ...>` so the CLI and tests can
/// swap storage backends without touching the rules.
pub struct ReservationEngine {
    repo: Arc<dyn ReservationRepository>,
    lending: LendingConfig,
}

impl ReservationEngine {
    pub fn new(repo: Arc<dyn ReservationRepository>, lending: LendingConfig) -> Self {
        Self { repo, lending }
    }

    // --- Cart ---

    /// Add a book to the user's cart.
    ///
    /// Rejected when the cart is full, the book is already in the cart, or
    /// no copy is currently available.
    pub async fn add_to_cart(&self, user_id: &str, book_id: i64) -> Result<(), BooknestError> {
        let availability = self
            .repo
            .get_availability(book_id)
            .await?
            .ok_or(BooknestError::BookNotFound { book_id })?;

        let count = self.repo.cart_count(user_id).await?;
        if count as usize >= self.lending.cart_limit {
            return Err(BooknestError::CartLimitReached {
                limit: self.lending.cart_limit,
            });
        }
        if self.repo.cart_contains(user_id, book_id).await? {
            return Err(BooknestError::DuplicateCartEntry {
                title: availability.book.title,
            });
        }
        if availability.copies_available <= 0 {
            return Err(BooknestError::BookUnavailable {
                title: availability.book.title,
            });
        }

        self.repo
            .add_cart_entry(&CartEntry::new(user_id, book_id))
            .await?;
        debug!(user_id, book_id, "added to cart");
        Ok(())
    }

    /// Remove a book from the user's cart. Removing an absent entry is a
    /// no-op.
    pub async fn remove_from_cart(&self, user_id: &str, book_id: i64) -> Result<(), BooknestError> {
        self.repo.remove_cart_entry(user_id, book_id).await
    }

    pub async fn cart_entries(&self, user_id: &str) -> Result<Vec<CartEntry>, BooknestError> {
        self.repo.cart_entries(user_id).await
    }

    /// Cart contents resolved to books with current availability, in the
    /// order they were added.
    pub async fn cart_books(&self, user_id: &str) -> Result<Vec<BookAvailability>, BooknestError> {
        let entries = self.repo.cart_entries(user_id).await?;
        let mut books = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(availability) = self.repo.get_availability(entry.book_id).await? {
                books.push(availability);
            }
        }
        Ok(books)
    }

    pub async fn clear_cart(&self, user_id: &str) -> Result<(), BooknestError> {
        self.repo.clear_cart(user_id).await
    }

    // --- Checkout and loan lifecycle ---

    /// Borrow a single book for one of the allowed durations, creating a
    /// history record in the borrowed state. The book is removed from the
    /// cart if present.
    pub async fn checkout(
        &self,
        user_id: &str,
        book_id: i64,
        duration_days: i64,
    ) -> Result<Loan, BooknestError> {
        self.validate_duration(duration_days)?;
        let availability = self
            .repo
            .get_availability(book_id)
            .await?
            .ok_or(BooknestError::BookNotFound { book_id })?;
        if availability.copies_available <= 0 {
            return Err(BooknestError::BookUnavailable {
                title: availability.book.title,
            });
        }

        let loan = Loan::new(user_id, &availability.book, duration_days);
        self.repo.insert_loan(&loan).await?;
        self.repo.remove_cart_entry(user_id, book_id).await?;
        info!(
            user_id,
            book_id,
            reservation_id = %loan.reservation_id,
            duration_days,
            "book borrowed"
        );
        Ok(loan)
    }

    /// Borrow every book in the user's cart for the same duration, then
    /// clear the cart. Availability is verified for the whole cart before
    /// any loan is written, so a cart with one unavailable book borrows
    /// nothing.
    pub async fn checkout_cart(
        &self,
        user_id: &str,
        duration_days: i64,
    ) -> Result<Vec<Loan>, BooknestError> {
        self.validate_duration(duration_days)?;
        let entries = self.repo.cart_entries(user_id).await?;

        let mut books = Vec::with_capacity(entries.len());
        for entry in &entries {
            let availability = self
                .repo
                .get_availability(entry.book_id)
                .await?
                .ok_or(BooknestError::BookNotFound {
                    book_id: entry.book_id,
                })?;
            if availability.copies_available <= 0 {
                return Err(BooknestError::BookUnavailable {
                    title: availability.book.title,
                });
            }
            books.push(availability.book);
        }

        let mut loans = Vec::with_capacity(books.len());
        for book in &books {
            let loan = Loan::new(user_id, book, duration_days);
            self.repo.insert_loan(&loan).await?;
            loans.push(loan);
        }
        self.repo.clear_cart(user_id).await?;
        info!(user_id, count = loans.len(), "cart checked out");
        Ok(loans)
    }

    /// Mark a borrowed book as returned, freeing its copy.
    pub async fn mark_returned(&self, reservation_id: &str) -> Result<Loan, BooknestError> {
        let mut loan = self.load_loan(reservation_id).await?;
        loan.mark_returned()?;
        self.repo.update_loan(&loan).await?;
        info!(reservation_id, "book returned");
        Ok(loan)
    }

    /// Apply the one-time loan extension.
    ///
    /// Blocked when the extension was already used, the loan is closed, or
    /// a future booking exists for this reservation or for the same book by
    /// another user.
    pub async fn extend_loan(&self, reservation_id: &str) -> Result<Loan, BooknestError> {
        let mut loan = self.load_loan(reservation_id).await?;
        match &loan.state {
            LoanState::Borrowed { extended: true, .. } => {
                return Err(BooknestError::AlreadyExtended);
            }
            LoanState::Borrowed { .. } => {}
            other => {
                return Err(BooknestError::LoanClosed {
                    state: other.label().to_string(),
                });
            }
        }

        if self
            .repo
            .has_blocking_booking(reservation_id, loan.book_id, &loan.user_id)
            .await?
        {
            return Err(BooknestError::ExtensionBlocked {
                reason: format!("`{}` has a pending booking by another reader", loan.book_title),
            });
        }

        loan.extend(self.lending.extension_days)?;
        self.repo.update_loan(&loan).await?;
        info!(reservation_id, due_date = %loan.due_date, "loan extended");
        Ok(loan)
    }

    /// Cancel a reservation. Rejected once the book has been picked up or
    /// the loan is closed.
    pub async fn cancel_reservation(&self, reservation_id: &str) -> Result<Loan, BooknestError> {
        let mut loan = self.load_loan(reservation_id).await?;
        loan.cancel()?;
        self.repo.update_loan(&loan).await?;
        info!(reservation_id, "reservation cancelled");
        Ok(loan)
    }

    /// Record that the user collected the physical copy.
    pub async fn mark_picked_up(&self, reservation_id: &str) -> Result<Loan, BooknestError> {
        let mut loan = self.load_loan(reservation_id).await?;
        loan.mark_picked_up()?;
        self.repo.update_loan(&loan).await?;
        debug!(reservation_id, "pickup recorded");
        Ok(loan)
    }

    // --- Future bookings ---

    /// Book a currently-borrowed title for later.
    ///
    /// The expected return date mirrors the active borrower's due date, or
    /// defaults to a week out when no copy is on loan. One booking per user
    /// per book.
    pub async fn book_for_later(
        &self,
        user_id: &str,
        book_id: i64,
    ) -> Result<FutureBooking, BooknestError> {
        if self.repo.get_book(book_id).await?.is_none() {
            return Err(BooknestError::BookNotFound { book_id });
        }
        if self
            .repo
            .booking_for_user_book(user_id, book_id)
            .await?
            .is_some()
        {
            return Err(BooknestError::BookingConflict { book_id });
        }

        let active = self.repo.active_loans_for_book(book_id).await?;
        let (expected_return, holder) = match active.first() {
            Some(loan) => (loan.due_date.clone(), Some(loan.reservation_id.clone())),
            None => {
                let fallback = (Utc::now() + Duration::days(7))
                    .format(TIMESTAMP_FORMAT)
                    .to_string();
                (fallback, None)
            }
        };

        let booking = FutureBooking::new(user_id, book_id, expected_return, holder);
        self.repo.insert_booking(&booking).await?;
        info!(user_id, book_id, booking_id = %booking.booking_id, "future booking recorded");
        Ok(booking)
    }

    /// Delete a future booking. Returns false when no such booking exists.
    pub async fn cancel_booking(&self, booking_id: &str) -> Result<bool, BooknestError> {
        let deleted = self.repo.delete_booking(booking_id).await?;
        if deleted {
            info!(booking_id, "booking cancelled");
        }
        Ok(deleted)
    }

    pub async fn bookings(&self, user_id: &str) -> Result<Vec<FutureBooking>, BooknestError> {
        self.repo.bookings_for_user(user_id).await
    }

    // --- History queries ---

    /// Loans currently in the borrowed state for this user.
    pub async fn currently_borrowed(&self, user_id: &str) -> Result<Vec<Loan>, BooknestError> {
        self.repo
            .loans_for_user(user_id, Some(LoanStatusFilter::Borrowed))
            .await
    }

    pub async fn total_borrowed_count(&self, user_id: &str) -> Result<i64, BooknestError> {
        self.repo.active_loan_count(user_id).await
    }

    /// Full history, newest first, optionally filtered by status.
    pub async fn history(
        &self,
        user_id: &str,
        filter: Option<LoanStatusFilter>,
    ) -> Result<Vec<Loan>, BooknestError> {
        self.repo.loans_for_user(user_id, filter).await
    }

    /// Delete the user's entire loan history. Returns the number of records
    /// removed.
    pub async fn clear_history(&self, user_id: &str) -> Result<u64, BooknestError> {
        let removed = self.repo.clear_history(user_id).await?;
        info!(user_id, removed, "history cleared");
        Ok(removed)
    }

    // --- Catalog queries ---

    /// Import a JSON catalog dataset. See [`crate::catalog`].
    pub async fn import_catalog(&self, json: &str) -> Result<usize, BooknestError> {
        crate::catalog::import_catalog(self.repo.as_ref(), json).await
    }

    pub async fn availability(&self, book_id: i64) -> Result<BookAvailability, BooknestError> {
        self.repo
            .get_availability(book_id)
            .await?
            .ok_or(BooknestError::BookNotFound { book_id })
    }

    pub async fn list_books(&self) -> Result<Vec<BookAvailability>, BooknestError> {
        self.repo.list_books().await
    }

    pub async fn reviews(&self, book_id: i64) -> Result<Vec<booknest_core::Review>, BooknestError> {
        self.repo.reviews_for_book(book_id).await
    }

    /// Case-insensitive substring search over title, author, and category.
    pub async fn search_books(&self, query: &str) -> Result<Vec<BookAvailability>, BooknestError> {
        let needle = query.to_lowercase();
        let books = self.repo.list_books().await?;
        Ok(books
            .into_iter()
            .filter(|b| {
                b.book.title.to_lowercase().contains(&needle)
                    || b.book.author.to_lowercase().contains(&needle)
                    || b.book.category.to_lowercase().contains(&needle)
            })
            .collect())
    }

    pub async fn filter_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<BookAvailability>, BooknestError> {
        let books = self.repo.list_books().await?;
        Ok(books
            .into_iter()
            .filter(|b| b.book.category.eq_ignore_ascii_case(category))
            .collect())
    }

    pub async fn filter_by_status(
        &self,
        status: BookStatus,
    ) -> Result<Vec<BookAvailability>, BooknestError> {
        let books = self.repo.list_books().await?;
        Ok(books.into_iter().filter(|b| b.status == status).collect())
    }

    /// Every distinct category in the catalog, sorted.
    pub async fn all_categories(&self) -> Result<Vec<String>, BooknestError> {
        let books = self.repo.list_books().await?;
        let mut categories: Vec<String> = books.into_iter().map(|b| b.book.category).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    // --- Wishlist ---

    /// Save a book for later. Saving an already-saved book is a no-op.
    pub async fn wishlist_add(&self, user_id: &str, book_id: i64) -> Result<(), BooknestError> {
        if self.repo.get_book(book_id).await?.is_none() {
            return Err(BooknestError::BookNotFound { book_id });
        }
        self.repo
            .wishlist_add(&WishlistEntry::new(user_id, book_id))
            .await
    }

    pub async fn wishlist_remove(&self, user_id: &str, book_id: i64) -> Result<(), BooknestError> {
        self.repo.wishlist_remove(user_id, book_id).await
    }

    pub async fn wishlist(&self, user_id: &str) -> Result<Vec<Book>, BooknestError> {
        self.repo.wishlist_books(user_id).await
    }

    // --- Internal helpers ---

    fn validate_duration(&self, days: i64) -> Result<(), BooknestError> {
        if self.lending.loan_durations.contains(&days) {
            Ok(())
        } else {
            Err(BooknestError::InvalidDuration { days })
        }
    }

    async fn load_loan(&self, reservation_id: &str) -> Result<Loan, BooknestError> {
        self.repo
            .get_loan(reservation_id)
            .await?
            .ok_or_else(|| BooknestError::ReservationNotFound {
                reservation_id: reservation_id.to_string(),
            })
    }
}
