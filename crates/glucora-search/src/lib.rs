// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval adapter over medical and web search backends.
//!
//! One [`MedicalRetriever`] serves all four source classes:
//! - `pubmed` — NCBI E-utilities (esearch + esummary)
//! - `clinical_trials` — ClinicalTrials.gov v2 study search
//! - `medical_web` — web search restricted to established medical domains
//! - `web` — unrestricted web search
//!
//! Base URLs are configurable, which also makes every backend testable
//! against a local mock server.

mod pubmed;
mod trials;
mod web;

use std::time::Duration;

use async_trait::async_trait;
use glucora_core::{
    AdapterType, CapabilityAdapter, GlucoraError, HealthStatus, RetrieveAdapter, SourceClass,
    SourceSnippet,
};

/// Construction options for [`MedicalRetriever`].
#[derive(Clone)]
pub struct SearchOptions {
    /// API key for the web search backend. `None` disables web classes.
    pub web_api_key: Option<String>,
    /// Web search endpoint URL.
    pub web_base_url: String,
    /// PubMed E-utilities base URL.
    pub pubmed_base_url: String,
    /// ClinicalTrials.gov v2 API base URL.
    pub trials_base_url: String,
    /// Bound on every outbound call.
    pub call_timeout: Duration,
}

impl std::fmt::Debug for SearchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOptions")
            .field("web_api_key", &self.web_api_key.as_ref().map(|_| "[redacted]"))
            .field("web_base_url", &self.web_base_url)
            .field("pubmed_base_url", &self.pubmed_base_url)
            .field("trials_base_url", &self.trials_base_url)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

/// Retrieval adapter dispatching each source class to its backend.
#[derive(Debug, Clone)]
pub struct MedicalRetriever {
    client: reqwest::Client,
    options: SearchOptions,
}

impl MedicalRetriever {
    pub fn new(options: SearchOptions) -> Result<Self, GlucoraError> {
        let client = reqwest::Client::builder()
            .timeout(options.call_timeout)
            .build()
            .map_err(|e| GlucoraError::Retrieval {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, options })
    }
}

#[async_trait]
impl CapabilityAdapter for MedicalRetriever {
    fn name(&self) -> &str {
        "medical-retriever"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Retrieval
    }

    async fn health_check(&self) -> Result<HealthStatus, GlucoraError> {
        if self.options.web_api_key.is_none() {
            return Ok(HealthStatus::Degraded(
                "web search disabled: no API key configured".to_string(),
            ));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), GlucoraError> {
        Ok(())
    }
}

#[async_trait]
impl RetrieveAdapter for MedicalRetriever {
    async fn search(
        &self,
        query: &str,
        class: SourceClass,
        limit: usize,
    ) -> Result<Vec<SourceSnippet>, GlucoraError> {
        match class {
            SourceClass::Pubmed => {
                pubmed::search(&self.client, &self.options.pubmed_base_url, query, limit).await
            }
            SourceClass::ClinicalTrials => {
                trials::search(&self.client, &self.options.trials_base_url, query, limit).await
            }
            SourceClass::MedicalWeb | SourceClass::Web => {
                let Some(api_key) = &self.options.web_api_key else {
                    return Err(GlucoraError::Retrieval {
                        message: "web search disabled: no API key configured".to_string(),
                        source: None,
                    });
                };
                web::search(
                    &self.client,
                    &self.options.web_base_url,
                    api_key,
                    query,
                    class,
                    limit,
                )
                .await
            }
        }
    }
}

/// Truncate snippet text on a character boundary.
pub(crate) fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let clipped: String = text.chars().take(max_chars).collect();
    format!("{clipped}…")
}
