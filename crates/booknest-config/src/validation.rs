// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and sane lending limits.

use crate::diagnostic::ConfigError;
use crate::model::BooknestConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BooknestConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.service.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.name must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.service.log_level
            ),
        });
    }

    if config.lending.cart_limit < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "lending.cart_limit must be at least 1, got {}",
                config.lending.cart_limit
            ),
        });
    }

    if config.lending.extension_days < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "lending.extension_days must be at least 1, got {}",
                config.lending.extension_days
            ),
        });
    }

    if config.lending.loan_durations.is_empty() {
        errors.push(ConfigError::Validation {
            message: "lending.loan_durations must not be empty".to_string(),
        });
    }

    for &days in &config.lending.loan_durations {
        if days < 1 {
            errors.push(ConfigError::Validation {
                message: format!("lending.loan_durations entries must be at least 1, got {days}"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
