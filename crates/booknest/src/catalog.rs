// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `booknest catalog` subcommands.

use std::path::PathBuf;

use clap::Subcommand;

use booknest_core::{BookStatus, BooknestError};
use booknest_engine::ReservationEngine;

use crate::output;

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Import a JSON catalog dataset, replacing books by id.
    Import { file: PathBuf },
    /// List every book with current availability.
    List {
        /// Show only books in one category.
        #[arg(long)]
        category: Option<String>,
        /// Show only available or borrowed books.
        #[arg(long)]
        status: Option<String>,
    },
    /// Search titles, authors, and categories.
    Search { query: String },
    /// Show one book in detail, including reviews.
    Show { book_id: i64 },
    /// List every distinct category.
    Categories,
}

pub async fn run(
    engine: &ReservationEngine,
    command: &CatalogCommands,
    json: bool,
    plain: bool,
) -> Result<(), BooknestError> {
    match command {
        CatalogCommands::Import { file } => {
            let data = tokio::fs::read_to_string(file)
                .await
                .map_err(|e| BooknestError::Internal(format!("cannot read {}: {e}", file.display())))?;
            let count = engine.import_catalog(&data).await?;
            output::print_outcome(&format!("imported {count} books"), json, plain);
        }
        CatalogCommands::List { category, status } => {
            let books = match (category, status) {
                (Some(category), _) => engine.filter_by_category(category).await?,
                (None, Some(status)) => {
                    let status: BookStatus = status
                        .parse()
                        .map_err(|_| BooknestError::Internal(format!("unknown status: {status}")))?;
                    engine.filter_by_status(status).await?
                }
                (None, None) => engine.list_books().await?,
            };
            output::print_books(&books, json, plain);
        }
        CatalogCommands::Search { query } => {
            let books = engine.search_books(query).await?;
            output::print_books(&books, json, plain);
        }
        CatalogCommands::Show { book_id } => {
            let availability = engine.availability(*book_id).await?;
            output::print_book_detail(&availability, json, plain);
            let reviews = engine.reviews(*book_id).await?;
            if json {
                output::print_json(&reviews);
            } else if !reviews.is_empty() {
                println!("  reviews:");
                for review in &reviews {
                    println!(
                        "    {:.1}/5.0 by {} — {}",
                        review.rating, review.reviewer, review.comment
                    );
                }
            }
        }
        CatalogCommands::Categories => {
            let categories = engine.all_categories().await?;
            if json {
                output::print_json(&categories);
            } else {
                for category in &categories {
                    println!("{category}");
                }
            }
        }
    }
    Ok(())
}
