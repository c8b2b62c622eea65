// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the BookNest reservation system.
//!
//! This crate provides the domain types, the loan lifecycle state machine,
//! the error type, and the repository trait that storage backends implement.
//! It holds every type that crosses a crate boundary in the workspace.

pub mod error;
pub mod loan;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BooknestError;
pub use loan::{Loan, LoanState, LoanStatusFilter};
pub use traits::ReservationRepository;
pub use types::{
    Book, BookAvailability, BookStatus, CartEntry, FutureBooking, Review, WishlistEntry,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lending_rule_errors_are_distinguished_from_infrastructure() {
        assert!(BooknestError::CartLimitReached { limit: 5 }.is_lending_rule());
        assert!(BooknestError::AlreadyExtended.is_lending_rule());
        assert!(
            BooknestError::BookingConflict { book_id: 1 }.is_lending_rule()
        );
        assert!(!BooknestError::Config("bad".into()).is_lending_rule());
        assert!(
            !BooknestError::Storage {
                source: Box::new(std::io::Error::other("disk"))
            }
            .is_lending_rule()
        );
        assert!(!BooknestError::Internal("bug".into()).is_lending_rule());
    }

    #[test]
    fn cart_limit_message_names_the_limit() {
        let err = BooknestError::CartLimitReached { limit: 5 };
        let msg = err.to_string();
        assert!(msg.contains("Cart limit reached"));
        assert!(msg.contains('5'));
    }
}
