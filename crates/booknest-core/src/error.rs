// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the BookNest reservation system.

use thiserror::Error;

/// The primary error type used across the BookNest repository trait and
/// reservation engine.
///
/// Lending-rule violations (cart full, duplicate entry, blocked extension)
/// are ordinary variants rather than panics: callers render the message and
/// move on. Storage and configuration failures carry their source error.
#[derive(Debug, Error)]
pub enum BooknestError {
    /// The user's cart already holds the maximum number of books.
    #[error("Cart limit reached. You can reserve at most {limit} books at a time.")]
    CartLimitReached { limit: usize },

    /// The book is already in the user's cart.
    #[error("`{title}` is already in your cart.")]
    DuplicateCartEntry { title: String },

    /// Every copy of the book is currently on loan.
    #[error("`{title}` is currently unavailable.")]
    BookUnavailable { title: String },

    /// No catalog entry exists for the given book id.
    #[error("book not found: {book_id}")]
    BookNotFound { book_id: i64 },

    /// No loan exists for the given reservation id.
    #[error("reservation not found: {reservation_id}")]
    ReservationNotFound { reservation_id: String },

    /// The loan has already used its one-time extension.
    #[error("This reservation has already been extended once.")]
    AlreadyExtended,

    /// The loan is no longer in the borrowed state.
    #[error("this loan is already {state}")]
    LoanClosed { state: String },

    /// A future booking blocks the extension.
    #[error("cannot extend: {reason}")]
    ExtensionBlocked { reason: String },

    /// The reservation cannot be cancelled after pickup.
    #[error("This reservation cannot be cancelled because the book has already been picked up.")]
    AlreadyPickedUp,

    /// The user already holds a future booking for this book.
    #[error("you already have a booking for book {book_id}")]
    BookingConflict { book_id: i64 },

    /// The requested loan duration is not an allowed value.
    #[error("invalid loan duration: {days} days")]
    InvalidDuration { days: i64 },

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BooknestError {
    /// True for lending-rule violations a caller is expected to handle by
    /// showing the message, false for infrastructure failures.
    pub fn is_lending_rule(&self) -> bool {
        !matches!(
            self,
            BooknestError::Config(_) | BooknestError::Storage { .. } | BooknestError::Internal(_)
        )
    }
}
