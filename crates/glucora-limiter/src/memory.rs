// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process counter store backed by a concurrent map.
//!
//! The default [`CounterAdapter`] for single-instance deployments. Atomicity
//! comes from the map's per-shard entry lock: the read-modify-write in
//! `increment_and_get` happens under that lock, so concurrent increments for
//! one key always observe distinct counts.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use glucora_core::{AdapterType, CapabilityAdapter, CounterAdapter, GlucoraError, HealthStatus};

#[derive(Debug, Clone, Copy)]
struct Slot {
    count: u64,
    expires_at: Instant,
}

/// Concurrent in-memory counter store with per-key expiry.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    slots: DashMap<String, Slot>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CapabilityAdapter for MemoryCounterStore {
    fn name(&self) -> &str {
        "memory-counter"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Counter
    }

    async fn health_check(&self) -> Result<HealthStatus, GlucoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), GlucoraError> {
        self.slots.clear();
        Ok(())
    }
}

#[async_trait]
impl CounterAdapter for MemoryCounterStore {
    async fn increment_and_get(
        &self,
        key: &str,
        ttl: Duration,
    ) -> Result<u64, GlucoraError> {
        let now = Instant::now();
        let mut slot = self.slots.entry(key.to_string()).or_insert(Slot {
            count: 0,
            expires_at: now + ttl,
        });
        if slot.expires_at <= now {
            slot.count = 0;
            slot.expires_at = now + ttl;
        }
        slot.count += 1;
        Ok(slot.count)
    }

    async fn get(&self, key: &str) -> Result<u64, GlucoraError> {
        Ok(self
            .slots
            .get(key)
            .filter(|slot| slot.expires_at > Instant::now())
            .map(|slot| slot.count)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(86_400);

    #[tokio::test]
    async fn increments_are_sequential() {
        let store = MemoryCounterStore::new();
        assert_eq!(store.increment_and_get("k", DAY).await.unwrap(), 1);
        assert_eq!(store.increment_and_get("k", DAY).await.unwrap(), 2);
        assert_eq!(store.get("k").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn missing_key_reads_zero() {
        let store = MemoryCounterStore::new();
        assert_eq!(store.get("absent").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn expired_key_resets_to_zero() {
        let store = MemoryCounterStore::new();
        store
            .increment_and_get("k", Duration::from_nanos(1))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(store.get("k").await.unwrap(), 0);
        assert_eq!(store.increment_and_get("k", DAY).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_observe_distinct_counts() {
        let store = std::sync::Arc::new(MemoryCounterStore::new());

        let mut handles = Vec::new();
        for _ in 0..64 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.increment_and_get("k", DAY).await.unwrap()
            }));
        }

        let mut counts = Vec::new();
        for handle in handles {
            counts.push(handle.await.unwrap());
        }
        counts.sort_unstable();
        let expected: Vec<u64> = (1..=64).collect();
        assert_eq!(counts, expected);
    }
}
