// SPDX-FileCopyrightText: 2026 BookNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./booknest.toml` > `~/.config/booknest/booknest.toml`
//! > `/etc/booknest/booknest.toml` with environment variable overrides via
//! `BOOKNEST_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BooknestConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/booknest/booknest.toml` (system-wide)
/// 3. `~/.config/booknest/booknest.toml` (user XDG config)
/// 4. `./booknest.toml` (local directory)
/// 5. `BOOKNEST_*` environment variables
pub fn load_config() -> Result<BooknestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BooknestConfig::default()))
        .merge(Toml::file("/etc/booknest/booknest.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("booknest/booknest.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("booknest.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config file specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BooknestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BooknestConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BooknestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BooknestConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `BOOKNEST_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("BOOKNEST_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: BOOKNEST_LENDING_CART_LIMIT -> "lending_cart_limit"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("lending_", "lending.", 1);
        mapped.into()
    })
}
