// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, positive limits, and
//! confidence thresholds inside the unit interval.

use crate::diagnostic::ConfigError;
use crate::model::GlucoraConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &GlucoraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.host `{host}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    if config.limits.research_daily_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.research_daily_limit must be at least 1".to_string(),
        });
    }

    let borderline = config.routing.borderline_confidence;
    if !(0.0..=1.0).contains(&borderline) {
        errors.push(ConfigError::Validation {
            message: format!(
                "routing.borderline_confidence must be within 0.0-1.0, got {borderline}"
            ),
        });
    }

    if config.routing.classify_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "routing.classify_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.generation.call_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "generation.call_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.session.max_turns == 0 {
        errors.push(ConfigError::Validation {
            message: "session.max_turns must be at least 1".to_string(),
        });
    }

    const KNOWN_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
    if !KNOWN_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {}, got `{}`",
                KNOWN_LEVELS.join(", "),
                config.agent.log_level
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
