// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted generation adapters.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;
use glucora_core::{
    AdapterType, CapabilityAdapter, GenerateAdapter, GenerationRequest, GlucoraError,
    HealthStatus, TextStream,
};

/// A generation adapter that replays queued responses in FIFO order and
/// records every request it receives.
///
/// With an empty queue it answers with a fixed placeholder instead of
/// panicking, so tests only script the calls they care about.
#[derive(Default)]
pub struct MockGenerator {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one response; builder-style for test setup.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push_response(response);
        self
    }

    pub fn push_response(&self, response: impl Into<String>) {
        self.responses.lock().unwrap().push_back(response.into());
    }

    /// All requests received so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next_response(&self, request: GenerationRequest) -> String {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "scripted answer".to_string())
    }
}

#[async_trait]
impl CapabilityAdapter for MockGenerator {
    fn name(&self) -> &str {
        "mock-generator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, GlucoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), GlucoraError> {
        Ok(())
    }
}

#[async_trait]
impl GenerateAdapter for MockGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GlucoraError> {
        Ok(self.next_response(request))
    }

    async fn generate_stream(
        &self,
        request: GenerationRequest,
    ) -> Result<TextStream, GlucoraError> {
        let response = self.next_response(request);
        // Chunk on whitespace to mimic token-by-token delivery.
        let chunks: Vec<Result<String, GlucoraError>> = response
            .split_inclusive(' ')
            .map(|chunk| Ok(chunk.to_string()))
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}

/// A generation adapter whose every call fails.
#[derive(Default)]
pub struct FailingGenerator;

impl FailingGenerator {
    pub fn new() -> Self {
        Self
    }

    fn error() -> GlucoraError {
        GlucoraError::Generation {
            message: "scripted generation failure".to_string(),
            source: None,
        }
    }
}

#[async_trait]
impl CapabilityAdapter for FailingGenerator {
    fn name(&self) -> &str {
        "failing-generator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, GlucoraError> {
        Ok(HealthStatus::Unhealthy("scripted failure".to_string()))
    }

    async fn shutdown(&self) -> Result<(), GlucoraError> {
        Ok(())
    }
}

#[async_trait]
impl GenerateAdapter for FailingGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GlucoraError> {
        Err(Self::error())
    }

    async fn generate_stream(
        &self,
        _request: GenerationRequest,
    ) -> Result<TextStream, GlucoraError> {
        Err(Self::error())
    }
}
