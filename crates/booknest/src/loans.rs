// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checkout, loan lifecycle, and history subcommands.

use clap::Subcommand;

use booknest_core::{BooknestError, LoanStatusFilter};
use booknest_engine::ReservationEngine;

use crate::output;

#[derive(Subcommand, Debug)]
pub enum LoanCommands {
    /// Return a borrowed book.
    Return { reservation_id: String },
    /// Apply the one-time 7-day extension.
    Extend { reservation_id: String },
    /// Cancel a reservation that has not been picked up.
    Cancel { reservation_id: String },
    /// Record that the book was collected.
    Pickup { reservation_id: String },
}

pub async fn run_checkout(
    engine: &ReservationEngine,
    user: &str,
    book_id: Option<i64>,
    days: i64,
    json: bool,
    plain: bool,
) -> Result<(), BooknestError> {
    match book_id {
        Some(book_id) => {
            let loan = engine.checkout(user, book_id, days).await?;
            output::print_outcome(
                &format!(
                    "borrowed `{}` until {} (reservation {})",
                    loan.book_title,
                    &loan.due_date[..10.min(loan.due_date.len())],
                    loan.reservation_id
                ),
                json,
                plain,
            );
        }
        None => {
            let loans = engine.checkout_cart(user, days).await?;
            if loans.is_empty() {
                output::print_outcome("cart is empty, nothing borrowed", json, plain);
            } else if json {
                output::print_json(&loans);
            } else {
                output::print_outcome(&format!("borrowed {} books", loans.len()), json, plain);
                output::print_loans(&loans, json, plain);
            }
        }
    }
    Ok(())
}

pub async fn run(
    engine: &ReservationEngine,
    command: &LoanCommands,
    json: bool,
    plain: bool,
) -> Result<(), BooknestError> {
    match command {
        LoanCommands::Return { reservation_id } => {
            let loan = engine.mark_returned(reservation_id).await?;
            output::print_outcome(&format!("returned `{}`", loan.book_title), json, plain);
        }
        LoanCommands::Extend { reservation_id } => {
            let loan = engine.extend_loan(reservation_id).await?;
            output::print_outcome(
                &format!(
                    "extended `{}` until {}",
                    loan.book_title,
                    &loan.due_date[..10.min(loan.due_date.len())]
                ),
                json,
                plain,
            );
        }
        LoanCommands::Cancel { reservation_id } => {
            let loan = engine.cancel_reservation(reservation_id).await?;
            output::print_outcome(&format!("cancelled `{}`", loan.book_title), json, plain);
        }
        LoanCommands::Pickup { reservation_id } => {
            let loan = engine.mark_picked_up(reservation_id).await?;
            output::print_outcome(&format!("pickup recorded for `{}`", loan.book_title), json, plain);
        }
    }
    Ok(())
}

pub async fn run_history(
    engine: &ReservationEngine,
    user: &str,
    status: Option<&str>,
    clear: bool,
    json: bool,
    plain: bool,
) -> Result<(), BooknestError> {
    if clear {
        let removed = engine.clear_history(user).await?;
        output::print_outcome(&format!("cleared {removed} history records"), json, plain);
        return Ok(());
    }

    let filter = match status {
        Some(s) => Some(s.parse::<LoanStatusFilter>().map_err(|_| {
            BooknestError::Internal(format!(
                "unknown status: {s} (expected borrowed, returned, or cancelled)"
            ))
        })?),
        None => None,
    };
    let loans = engine.history(user, filter).await?;
    output::print_loans(&loans, json, plain);
    Ok(())
}
