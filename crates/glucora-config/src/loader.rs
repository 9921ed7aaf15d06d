// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./glucora.toml` > `~/.config/glucora/glucora.toml` >
//! `/etc/glucora/glucora.toml` with environment variable overrides via the
//! `GLUCORA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::GlucoraConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/glucora/glucora.toml` (system-wide)
/// 3. `~/.config/glucora/glucora.toml` (user XDG config)
/// 4. `./glucora.toml` (local directory)
/// 5. `GLUCORA_*` environment variables
pub fn load_config() -> Result<GlucoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GlucoraConfig::default()))
        .merge(Toml::file("/etc/glucora/glucora.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("glucora/glucora.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("glucora.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<GlucoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GlucoraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<GlucoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GlucoraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `GLUCORA_LIMITS_RESEARCH_DAILY_LIMIT`
/// must map to `limits.research_daily_limit`, not `limits.research.daily.limit`.
fn env_provider() -> Env {
    Env::prefixed("GLUCORA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: GLUCORA_GENERATION_API_KEY -> "generation_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("server_", "server.", 1)
            .replacen("generation_", "generation.", 1)
            .replacen("search_", "search.", 1)
            .replacen("routing_", "routing.", 1)
            .replacen("limits_", "limits.", 1)
            .replacen("session_", "session.", 1);
        mapped.into()
    })
}
