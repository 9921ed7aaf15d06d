// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Glucora answer engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The primary error type used across all Glucora adapter traits and core operations.
#[derive(Debug, Error)]
pub enum GlucoraError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Generation capability errors (API failure, malformed response, model not found).
    #[error("generation error: {message}")]
    Generation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Retrieval capability errors (search API failure, malformed result payload).
    #[error("retrieval error: {message}")]
    Retrieval {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Counter store errors (backend unreachable, key encoding failure).
    #[error("counter store error: {source}")]
    Counter {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Request rejected before any tier work (missing/empty question or user id).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Daily admission cap reached for the research tier.
    #[error("rate limit exceeded: {remaining} remaining, resets at {reset_at}")]
    RateLimited {
        remaining: u32,
        reset_at: DateTime<Utc>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
