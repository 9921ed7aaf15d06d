// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval adapter trait for the black-box search capability.

use async_trait::async_trait;

use crate::error::GlucoraError;
use crate::traits::adapter::CapabilityAdapter;
use crate::types::{SourceClass, SourceSnippet};

/// Adapter for the retrieval capability: "given a query, return ranked
/// source snippets".
///
/// A single adapter serves multiple source classes; the executor names the
/// class it wants per call so implementations can dispatch to the right
/// backend (PubMed, trial registries, general web search).
#[async_trait]
pub trait RetrieveAdapter: CapabilityAdapter {
    /// Searches one source class and returns up to `limit` ranked snippets.
    async fn search(
        &self,
        query: &str,
        class: SourceClass,
        limit: usize,
    ) -> Result<Vec<SourceSnippet>, GlucoraError>;
}
