// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `booknest cart` subcommands.

use clap::Subcommand;

use booknest_core::BooknestError;
use booknest_engine::ReservationEngine;

use crate::output;

#[derive(Subcommand, Debug)]
pub enum CartCommands {
    /// Add a book to the cart.
    Add { book_id: i64 },
    /// Remove a book from the cart.
    Remove { book_id: i64 },
    /// Show the cart contents.
    List,
    /// Empty the cart.
    Clear,
}

pub async fn run(
    engine: &ReservationEngine,
    command: &CartCommands,
    user: &str,
    json: bool,
    plain: bool,
) -> Result<(), BooknestError> {
    match command {
        CartCommands::Add { book_id } => {
            engine.add_to_cart(user, *book_id).await?;
            output::print_outcome(&format!("book {book_id} added to cart"), json, plain);
        }
        CartCommands::Remove { book_id } => {
            engine.remove_from_cart(user, *book_id).await?;
            output::print_outcome(&format!("book {book_id} removed from cart"), json, plain);
        }
        CartCommands::List => {
            let books = engine.cart_books(user).await?;
            output::print_books(&books, json, plain);
        }
        CartCommands::Clear => {
            engine.clear_cart(user).await?;
            output::print_outcome("cart cleared", json, plain);
        }
    }
    Ok(())
}
