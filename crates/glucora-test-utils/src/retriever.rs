// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted retrieval adapters.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use glucora_core::{
    AdapterType, CapabilityAdapter, GlucoraError, HealthStatus, RetrieveAdapter, SourceClass,
    SourceSnippet,
};

/// A retrieval adapter serving canned snippets per source class and
/// recording every query it receives.
///
/// Classes with no canned snippets return an empty result, which is a valid
/// search outcome the executors must tolerate anyway.
#[derive(Default)]
pub struct MockRetriever {
    canned: Mutex<HashMap<SourceClass, Vec<SourceSnippet>>>,
    queries: Mutex<Vec<(SourceClass, String)>>,
}

impl MockRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `count` generated snippets for a source class; builder-style.
    pub fn with_snippets(self, class: SourceClass, count: usize) -> Self {
        let snippets = (1..=count).map(|i| snippet(class, i)).collect();
        self.canned.lock().unwrap().insert(class, snippets);
        self
    }

    pub fn push_snippet(&self, class: SourceClass, snippet: SourceSnippet) {
        self.canned
            .lock()
            .unwrap()
            .entry(class)
            .or_default()
            .push(snippet);
    }

    /// All `(class, query)` pairs received so far, in call order.
    pub fn queries(&self) -> Vec<(SourceClass, String)> {
        self.queries.lock().unwrap().clone()
    }
}

/// A deterministic snippet for a class, numbered from 1.
pub fn snippet(class: SourceClass, index: usize) -> SourceSnippet {
    SourceSnippet {
        title: format!("{class} result {index}"),
        url: format!("https://example.org/{class}/{index}"),
        snippet: format!("Snippet body {index} for {class}."),
        class,
    }
}

#[async_trait]
impl CapabilityAdapter for MockRetriever {
    fn name(&self) -> &str {
        "mock-retriever"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Retrieval
    }

    async fn health_check(&self) -> Result<HealthStatus, GlucoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), GlucoraError> {
        Ok(())
    }
}

#[async_trait]
impl RetrieveAdapter for MockRetriever {
    async fn search(
        &self,
        query: &str,
        class: SourceClass,
        limit: usize,
    ) -> Result<Vec<SourceSnippet>, GlucoraError> {
        self.queries
            .lock()
            .unwrap()
            .push((class, query.to_string()));
        let canned = self.canned.lock().unwrap();
        Ok(canned
            .get(&class)
            .map(|snippets| snippets.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

/// A retrieval adapter whose every call fails.
#[derive(Default)]
pub struct FailingRetriever;

impl FailingRetriever {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CapabilityAdapter for FailingRetriever {
    fn name(&self) -> &str {
        "failing-retriever"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Retrieval
    }

    async fn health_check(&self) -> Result<HealthStatus, GlucoraError> {
        Ok(HealthStatus::Unhealthy("scripted failure".to_string()))
    }

    async fn shutdown(&self) -> Result<(), GlucoraError> {
        Ok(())
    }
}

#[async_trait]
impl RetrieveAdapter for FailingRetriever {
    async fn search(
        &self,
        _query: &str,
        _class: SourceClass,
        _limit: usize,
    ) -> Result<Vec<SourceSnippet>, GlucoraError> {
        Err(GlucoraError::Retrieval {
            message: "scripted retrieval failure".to_string(),
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_canned_snippets_up_to_limit() {
        let retriever = MockRetriever::new().with_snippets(SourceClass::Pubmed, 5);
        let results = retriever
            .search("metformin", SourceClass::Pubmed, 3)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].class, SourceClass::Pubmed);
    }

    #[tokio::test]
    async fn unseeded_class_returns_empty() {
        let retriever = MockRetriever::new().with_snippets(SourceClass::Pubmed, 2);
        let results = retriever
            .search("metformin", SourceClass::Web, 3)
            .await
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(retriever.queries().len(), 1);
    }
}
