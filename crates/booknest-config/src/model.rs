// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the BookNest reservation service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level BookNest configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BooknestConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Lending rule settings.
    #[serde(default)]
    pub lending: LendingConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "booknest".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Whether to enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "booknest.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Lending rule configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LendingConfig {
    /// Maximum number of books a user may hold in the cart at once.
    #[serde(default = "default_cart_limit")]
    pub cart_limit: usize,

    /// Days added to the due date by the one-time extension.
    #[serde(default = "default_extension_days")]
    pub extension_days: i64,

    /// Loan durations (in days) a user may choose at checkout.
    #[serde(default = "default_loan_durations")]
    pub loan_durations: Vec<i64>,
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            cart_limit: default_cart_limit(),
            extension_days: default_extension_days(),
            loan_durations: default_loan_durations(),
        }
    }
}

fn default_cart_limit() -> usize {
    5
}

fn default_extension_days() -> i64 {
    7
}

fn default_loan_durations() -> Vec<i64> {
    vec![7, 14, 21]
}
