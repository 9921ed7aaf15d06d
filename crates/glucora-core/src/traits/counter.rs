// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counter adapter trait for the atomic usage counter store.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::GlucoraError;
use crate::traits::adapter::CapabilityAdapter;

/// Adapter for the per-user usage counter store.
///
/// The store is modeled as an externally owned resource so the rate limiter
/// stays correct under multiple concurrent server instances. The only hard
/// requirement is that `increment_and_get` is atomic: two concurrent calls
/// for the same key must observe distinct counts.
#[async_trait]
pub trait CounterAdapter: CapabilityAdapter {
    /// Atomically increments the counter at `key` and returns the new count.
    ///
    /// A key incremented for the first time is created with the given
    /// time-to-live; expiry resets the count to zero.
    async fn increment_and_get(&self, key: &str, ttl: Duration)
    -> Result<u64, GlucoraError>;

    /// Reads the current count without side effects. Missing or expired
    /// keys read as zero.
    async fn get(&self, key: &str) -> Result<u64, GlucoraError>;
}
