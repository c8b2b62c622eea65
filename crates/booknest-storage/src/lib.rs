// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the BookNest reservation system.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed query
//! modules for the catalog, carts, loans, future bookings, and wishlists.
//! [`SqliteRepository`] implements the `ReservationRepository` trait from
//! `booknest-core` on top of those modules.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod repository;

pub use database::Database;
pub use repository::SqliteRepository;
