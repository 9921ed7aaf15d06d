// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted counter adapters.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use glucora_core::{
    AdapterType, CapabilityAdapter, CounterAdapter, GlucoraError, HealthStatus,
};

/// A counter store whose every call fails, for exercising fail policies.
#[derive(Default)]
pub struct FailingCounter;

impl FailingCounter {
    pub fn new() -> Self {
        Self
    }

    fn error() -> GlucoraError {
        GlucoraError::Counter {
            source: Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "scripted counter failure",
            )),
        }
    }
}

#[async_trait]
impl CapabilityAdapter for FailingCounter {
    fn name(&self) -> &str {
        "failing-counter"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Counter
    }

    async fn health_check(&self) -> Result<HealthStatus, GlucoraError> {
        Ok(HealthStatus::Unhealthy("scripted failure".to_string()))
    }

    async fn shutdown(&self) -> Result<(), GlucoraError> {
        Ok(())
    }
}

#[async_trait]
impl CounterAdapter for FailingCounter {
    async fn increment_and_get(
        &self,
        _key: &str,
        _ttl: Duration,
    ) -> Result<u64, GlucoraError> {
        Err(Self::error())
    }

    async fn get(&self, _key: &str) -> Result<u64, GlucoraError> {
        Err(Self::error())
    }
}
