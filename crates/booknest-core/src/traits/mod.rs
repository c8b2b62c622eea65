// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the reservation engine and storage backends.

pub mod repository;

pub use repository::ReservationRepository;
