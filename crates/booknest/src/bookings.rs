// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `booknest book-later` and `booknest booking` subcommands.

use clap::Subcommand;

use booknest_core::BooknestError;
use booknest_engine::ReservationEngine;

use crate::output;

#[derive(Subcommand, Debug)]
pub enum BookingCommands {
    /// Show the user's future bookings.
    List,
    /// Cancel a future booking.
    Cancel { booking_id: String },
}

pub async fn run_book_later(
    engine: &ReservationEngine,
    user: &str,
    book_id: i64,
    json: bool,
    plain: bool,
) -> Result<(), BooknestError> {
    let booking = engine.book_for_later(user, book_id).await?;
    output::print_outcome(
        &format!(
            "booked book {} for later, expected back {} (booking {})",
            booking.book_id,
            &booking.expected_return_date[..10.min(booking.expected_return_date.len())],
            booking.booking_id
        ),
        json,
        plain,
    );
    Ok(())
}

pub async fn run(
    engine: &ReservationEngine,
    command: &BookingCommands,
    user: &str,
    json: bool,
    plain: bool,
) -> Result<(), BooknestError> {
    match command {
        BookingCommands::List => {
            let bookings = engine.bookings(user).await?;
            output::print_bookings(&bookings, json, plain);
        }
        BookingCommands::Cancel { booking_id } => {
            if engine.cancel_booking(booking_id).await? {
                output::print_outcome("booking cancelled", json, plain);
            } else {
                return Err(BooknestError::Internal(format!(
                    "no booking found with id {booking_id}"
                )));
            }
        }
    }
    Ok(())
}
