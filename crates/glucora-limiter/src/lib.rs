// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user daily admission control for research-tier requests.
//!
//! Deep research fans out to several external services per request, so each
//! user gets a fixed number of research admissions per UTC day. The limiter
//! keeps no state of its own; it drives an atomic [`CounterAdapter`] keyed by
//! user and UTC date, which keeps counting correct across concurrent
//! requests and across server instances sharing a counter store.

pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use glucora_core::{CounterAdapter, GlucoraError, RateLimitInfo, UsageSnapshot};
use tracing::warn;

pub use memory::MemoryCounterStore;

/// What to do when the counter store is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailPolicy {
    /// Admit the request and mark the response degraded.
    #[default]
    Open,
    /// Deny the request.
    Closed,
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub allowed: bool,
    /// Admissions left today after this check. Zero when denied or degraded.
    pub remaining: u32,
    /// Next UTC day boundary, when the counter resets.
    pub reset_at: DateTime<Utc>,
    /// True when the counter store failed and the policy decided the outcome.
    pub degraded: bool,
}

impl Admission {
    pub fn rate_limit_info(&self) -> RateLimitInfo {
        RateLimitInfo {
            remaining: self.remaining,
            reset_at: self.reset_at,
            degraded: self.degraded,
        }
    }
}

/// Daily admission limiter over an atomic counter store.
pub struct DailyLimiter {
    counter: Arc<dyn CounterAdapter>,
    limit: u32,
    fail_policy: FailPolicy,
}

impl DailyLimiter {
    pub fn new(counter: Arc<dyn CounterAdapter>, limit: u32, fail_policy: FailPolicy) -> Self {
        Self {
            counter,
            limit,
            fail_policy,
        }
    }

    /// The configured daily admission limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Check-and-consume one research admission for `user_id`.
    ///
    /// Increment-then-compare: the counter is bumped first and the new count
    /// decides admission, so two racing requests at the boundary can never
    /// both slip under the limit. Never returns an error; a store failure is
    /// resolved by the configured [`FailPolicy`] and flagged as degraded.
    pub async fn admit(&self, user_id: &str) -> Admission {
        let now = Utc::now();
        let key = usage_key(user_id, now);
        let reset_at = next_utc_midnight(now);
        let ttl = ttl_until(now, reset_at);

        match self.counter.increment_and_get(&key, ttl).await {
            Ok(count) => {
                let allowed = count <= u64::from(self.limit);
                let remaining = u64::from(self.limit).saturating_sub(count) as u32;
                Admission {
                    allowed,
                    remaining,
                    reset_at,
                    degraded: false,
                }
            }
            Err(err) => {
                let allowed = self.fail_policy == FailPolicy::Open;
                warn!(
                    user_id,
                    allowed,
                    error = %err,
                    "counter store unavailable, applying fail policy"
                );
                Admission {
                    allowed,
                    remaining: 0,
                    reset_at,
                    degraded: true,
                }
            }
        }
    }

    /// Read-only usage snapshot for `user_id`, without consuming anything.
    pub async fn usage(&self, user_id: &str) -> Result<UsageSnapshot, GlucoraError> {
        let now = Utc::now();
        let count = self.counter.get(&usage_key(user_id, now)).await?;
        let count = count.min(u64::from(u32::MAX)) as u32;
        Ok(UsageSnapshot {
            count,
            limit: self.limit,
            remaining: self.limit.saturating_sub(count),
            reset_at: next_utc_midnight(now),
        })
    }
}

/// Counter key for a user's research admissions on a given UTC day.
fn usage_key(user_id: &str, now: DateTime<Utc>) -> String {
    format!("research:{}:{}", user_id, now.format("%Y%m%d"))
}

fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);
    tomorrow.and_time(NaiveTime::MIN).and_utc()
}

fn ttl_until(now: DateTime<Utc>, reset_at: DateTime<Utc>) -> Duration {
    (reset_at - now).to_std().unwrap_or(Duration::from_secs(1))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use glucora_test_utils::FailingCounter;

    use super::*;

    fn limiter(limit: u32, policy: FailPolicy) -> DailyLimiter {
        DailyLimiter::new(Arc::new(MemoryCounterStore::new()), limit, policy)
    }

    #[tokio::test]
    async fn admits_until_limit_then_denies() {
        let limiter = limiter(3, FailPolicy::Open);

        for expected_remaining in [2, 1, 0] {
            let admission = limiter.admit("alice").await;
            assert!(admission.allowed);
            assert!(!admission.degraded);
            assert_eq!(admission.remaining, expected_remaining);
        }

        let denied = limiter.admit("alice").await;
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert!(!denied.degraded);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let limiter = limiter(1, FailPolicy::Open);
        assert!(limiter.admit("alice").await.allowed);
        assert!(!limiter.admit("alice").await.allowed);
        assert!(limiter.admit("bob").await.allowed);
    }

    #[tokio::test]
    async fn usage_does_not_consume() {
        let limiter = limiter(5, FailPolicy::Open);
        limiter.admit("alice").await;
        limiter.admit("alice").await;

        let snapshot = limiter.usage("alice").await.unwrap();
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.limit, 5);
        assert_eq!(snapshot.remaining, 3);

        let again = limiter.usage("alice").await.unwrap();
        assert_eq!(again.count, 2);
    }

    #[tokio::test]
    async fn store_failure_fails_open_and_degrades() {
        let limiter = DailyLimiter::new(Arc::new(FailingCounter::new()), 3, FailPolicy::Open);
        let admission = limiter.admit("alice").await;
        assert!(admission.allowed);
        assert!(admission.degraded);
        assert_eq!(admission.remaining, 0);
    }

    #[tokio::test]
    async fn store_failure_fails_closed_when_configured() {
        let limiter = DailyLimiter::new(Arc::new(FailingCounter::new()), 3, FailPolicy::Closed);
        let admission = limiter.admit("alice").await;
        assert!(!admission.allowed);
        assert!(admission.degraded);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn boundary_race_admits_exactly_limit() {
        let limiter = Arc::new(limiter(10, FailPolicy::Open));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(
                async move { limiter.admit("alice").await.allowed },
            ));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 10);
    }

    #[test]
    fn key_is_user_and_utc_day_scoped() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap();
        assert_eq!(usage_key("alice", ts), "research:alice:20260314");
    }

    #[test]
    fn reset_is_next_utc_midnight() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap();
        let reset = next_utc_midnight(ts);
        assert_eq!(reset, Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
    }
}
