// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on reservation entities.

pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod loans;
pub mod wishlist;
