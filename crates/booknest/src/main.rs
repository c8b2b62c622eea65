// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BookNest - a library reservation store.
//!
//! Binary entry point: loads configuration, opens the SQLite-backed
//! repository, and dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use booknest_core::BooknestError;
use booknest_engine::ReservationEngine;
use booknest_storage::SqliteRepository;

mod bookings;
mod cart;
mod catalog;
mod loans;
mod output;
mod wishlist;

/// BookNest - a library reservation store.
#[derive(Parser, Debug)]
#[command(name = "booknest", version, about, long_about = None)]
struct Cli {
    /// Path to a config file (overrides the default search locations).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// User id owning the cart, history, bookings, and wishlist.
    #[arg(long, global = true, default_value = "guest")]
    user: String,

    /// Emit structured JSON instead of human-readable output.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Browse and manage the book catalog.
    Catalog {
        #[command(subcommand)]
        command: catalog::CatalogCommands,
    },
    /// Manage the reservation cart.
    Cart {
        #[command(subcommand)]
        command: cart::CartCommands,
    },
    /// Borrow a book, or the whole cart when no book id is given.
    Checkout {
        /// Book to borrow; omit to check out every book in the cart.
        book_id: Option<i64>,
        /// Loan duration in days.
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
    /// Manage an active reservation.
    Loan {
        #[command(subcommand)]
        command: loans::LoanCommands,
    },
    /// Show the loan history, optionally filtered by status.
    History {
        /// Filter by status: borrowed, returned, or cancelled.
        #[arg(long)]
        status: Option<String>,
        /// Delete the entire history instead of showing it.
        #[arg(long)]
        clear: bool,
    },
    /// Book a borrowed title for when it comes back.
    BookLater {
        book_id: i64,
    },
    /// Manage future bookings.
    Booking {
        #[command(subcommand)]
        command: bookings::BookingCommands,
    },
    /// Manage the saved-for-later wishlist.
    Wishlist {
        #[command(subcommand)]
        command: wishlist::WishlistCommands,
    },
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("booknest={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

async fn run(cli: &Cli, engine: &ReservationEngine) -> Result<(), BooknestError> {
    match &cli.command {
        Commands::Catalog { command } => {
            catalog::run(engine, command, cli.json, cli.plain).await
        }
        Commands::Cart { command } => {
            cart::run(engine, command, &cli.user, cli.json, cli.plain).await
        }
        Commands::Checkout { book_id, days } => {
            loans::run_checkout(engine, &cli.user, *book_id, *days, cli.json, cli.plain).await
        }
        Commands::Loan { command } => loans::run(engine, command, cli.json, cli.plain).await,
        Commands::History { status, clear } => {
            loans::run_history(
                engine,
                &cli.user,
                status.as_deref(),
                *clear,
                cli.json,
                cli.plain,
            )
            .await
        }
        Commands::BookLater { book_id } => {
            bookings::run_book_later(engine, &cli.user, *book_id, cli.json, cli.plain).await
        }
        Commands::Booking { command } => {
            bookings::run(engine, command, &cli.user, cli.json, cli.plain).await
        }
        Commands::Wishlist { command } => {
            wishlist::run(engine, command, &cli.user, cli.json, cli.plain).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => booknest_config::load_and_validate_path(path),
        None => booknest_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => config,
        Err(errors) => {
            booknest_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);

    let repo = match SqliteRepository::open(&config.storage).await {
        Ok(repo) => Arc::new(repo),
        Err(err) => {
            tracing::error!(error = %err, "failed to open database");
            eprintln!("booknest: {err}");
            std::process::exit(1);
        }
    };
    let engine = ReservationEngine::new(repo.clone(), config.lending.clone());

    let result = run(&cli, &engine).await;
    let _ = repo.close().await;

    if let Err(err) = result {
        if !err.is_lending_rule() {
            tracing::error!(error = %err, "command failed");
        }
        if cli.json {
            let outcome = output::CommandOutcome {
                success: false,
                message: err.to_string(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome).unwrap_or_else(|_| "{}".to_string())
            );
        } else {
            eprintln!("booknest: {err}");
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_global_flags_on_subcommands() {
        let cli = Cli::parse_from(["booknest", "catalog", "list", "--user", "maya", "--json"]);
        assert_eq!(cli.user, "maya");
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Catalog { .. }));
    }

    #[test]
    fn checkout_defaults_to_seven_days() {
        let cli = Cli::parse_from(["booknest", "checkout", "3"]);
        match cli.command {
            Commands::Checkout { book_id, days } => {
                assert_eq!(book_id, Some(3));
                assert_eq!(days, 7);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = booknest_config::load_config_from_str("")
            .expect("default config should be valid");
        assert_eq!(config.service.name, "booknest");
    }
}
