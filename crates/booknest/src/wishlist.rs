// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `booknest wishlist` subcommands.

use clap::Subcommand;

use booknest_core::BooknestError;
use booknest_engine::ReservationEngine;

use crate::output;

#[derive(Subcommand, Debug)]
pub enum WishlistCommands {
    /// Save a book for later.
    Add { book_id: i64 },
    /// Remove a book from the wishlist.
    Remove { book_id: i64 },
    /// Show the wishlist.
    List,
}

pub async fn run(
    engine: &ReservationEngine,
    command: &WishlistCommands,
    user: &str,
    json: bool,
    plain: bool,
) -> Result<(), BooknestError> {
    match command {
        WishlistCommands::Add { book_id } => {
            engine.wishlist_add(user, *book_id).await?;
            output::print_outcome(&format!("book {book_id} saved to wishlist"), json, plain);
        }
        WishlistCommands::Remove { book_id } => {
            engine.wishlist_remove(user, *book_id).await?;
            output::print_outcome(&format!("book {book_id} removed from wishlist"), json, plain);
        }
        WishlistCommands::List => {
            let books = engine.wishlist(user).await?;
            output::print_wishlist(&books, json, plain);
        }
    }
    Ok(())
}
