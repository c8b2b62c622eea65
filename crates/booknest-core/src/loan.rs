// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loan records and their lifecycle state machine.
//!
//! A [`Loan`] is one confirmed reservation. Its lifecycle is a tagged
//! [`LoanState`] variant rather than a bag of boolean flags, and every
//! transition goes through a method that rejects invalid moves. The engine
//! never mutates loan state fields directly.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::BooknestError;
use crate::types::{now_timestamp, Book, TIMESTAMP_FORMAT};

/// Lifecycle state of a loan.
///
/// `Borrowed` is the only live state; `Returned` and `Cancelled` are
/// terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LoanState {
    Borrowed {
        /// One-time extension already used.
        extended: bool,
        /// Book physically collected by the borrower.
        picked_up: bool,
        pickup_date: Option<String>,
        extension_date: Option<String>,
    },
    Returned {
        return_date: String,
    },
    Cancelled {
        cancel_date: String,
    },
}

impl LoanState {
    /// Storage label for this state ("borrowed" | "returned" | "cancelled").
    pub fn label(&self) -> &'static str {
        match self {
            LoanState::Borrowed { .. } => "borrowed",
            LoanState::Returned { .. } => "returned",
            LoanState::Cancelled { .. } => "cancelled",
        }
    }
}

/// Filter for history queries, parsed from CLI input ("borrowed" etc.).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatusFilter {
    Borrowed,
    Returned,
    Cancelled,
}

/// One confirmed reservation, from checkout to return or cancellation.
///
/// Title and author are snapshotted at checkout time so history stays
/// readable even if the catalog is re-imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique reservation token (UUID v4).
    pub reservation_id: String,
    pub user_id: String,
    pub book_id: i64,
    pub book_title: String,
    pub book_author: String,
    pub borrow_date: String,
    pub due_date: String,
    pub duration_days: i64,
    pub state: LoanState,
}

impl Loan {
    /// Create a new borrowed loan with `due_date = now + duration_days`.
    pub fn new(user_id: impl Into<String>, book: &Book, duration_days: i64) -> Self {
        let borrow = Utc::now();
        let due = borrow + Duration::days(duration_days);
        Self {
            reservation_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            book_id: book.id,
            book_title: book.title.clone(),
            book_author: book.author.clone(),
            borrow_date: borrow.format(TIMESTAMP_FORMAT).to_string(),
            due_date: due.format(TIMESTAMP_FORMAT).to_string(),
            duration_days,
            state: LoanState::Borrowed {
                extended: false,
                picked_up: false,
                pickup_date: None,
                extension_date: None,
            },
        }
    }

    /// True while the loan counts against the book's available copies.
    pub fn is_active(&self) -> bool {
        matches!(self.state, LoanState::Borrowed { .. })
    }

    /// Transition `Borrowed -> Returned`, stamping the return date.
    pub fn mark_returned(&mut self) -> Result<(), BooknestError> {
        match &self.state {
            LoanState::Borrowed { .. } => {
                self.state = LoanState::Returned {
                    return_date: now_timestamp(),
                };
                Ok(())
            }
            other => Err(BooknestError::LoanClosed {
                state: other.label().to_string(),
            }),
        }
    }

    /// Apply the one-time extension, pushing the due date out by
    /// `extension_days`.
    ///
    /// Booking conflicts are the engine's concern; this method only enforces
    /// the state machine (borrowed, not yet extended).
    pub fn extend(&mut self, extension_days: i64) -> Result<(), BooknestError> {
        match &self.state {
            LoanState::Borrowed { extended: true, .. } => Err(BooknestError::AlreadyExtended),
            LoanState::Borrowed {
                extended: false,
                picked_up,
                pickup_date,
                ..
            } => {
                let due = parse_timestamp(&self.due_date)?;
                self.due_date = (due + Duration::days(extension_days))
                    .format(TIMESTAMP_FORMAT)
                    .to_string();
                self.state = LoanState::Borrowed {
                    extended: true,
                    picked_up: *picked_up,
                    pickup_date: pickup_date.clone(),
                    extension_date: Some(now_timestamp()),
                };
                Ok(())
            }
            other => Err(BooknestError::LoanClosed {
                state: other.label().to_string(),
            }),
        }
    }

    /// Transition `Borrowed -> Cancelled`. Rejected after pickup: the book
    /// must come back through a return instead.
    pub fn cancel(&mut self) -> Result<(), BooknestError> {
        match &self.state {
            LoanState::Borrowed { picked_up: true, .. } => Err(BooknestError::AlreadyPickedUp),
            LoanState::Borrowed { .. } => {
                self.state = LoanState::Cancelled {
                    cancel_date: now_timestamp(),
                };
                Ok(())
            }
            other => Err(BooknestError::LoanClosed {
                state: other.label().to_string(),
            }),
        }
    }

    /// Record that the borrower collected the book. Idempotent while
    /// borrowed; rejected once the loan is closed.
    pub fn mark_picked_up(&mut self) -> Result<(), BooknestError> {
        match &self.state {
            LoanState::Borrowed { picked_up: true, .. } => Ok(()),
            LoanState::Borrowed {
                extended,
                extension_date,
                ..
            } => {
                self.state = LoanState::Borrowed {
                    extended: *extended,
                    picked_up: true,
                    pickup_date: Some(now_timestamp()),
                    extension_date: extension_date.clone(),
                };
                Ok(())
            }
            other => Err(BooknestError::LoanClosed {
                state: other.label().to_string(),
            }),
        }
    }
}

pub(crate) fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>, BooknestError> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BooknestError::Internal(format!("unparseable timestamp `{ts}`: {e}")))
}
