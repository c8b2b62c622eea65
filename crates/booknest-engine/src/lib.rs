// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reservation engine for the BookNest service.
//!
//! Provides [`ReservationEngine`], the lending-rule layer between the CLI
//! and the storage repository, plus catalog dataset import.

pub mod catalog;
pub mod engine;

pub use catalog::import_catalog;
pub use engine::ReservationEngine;
