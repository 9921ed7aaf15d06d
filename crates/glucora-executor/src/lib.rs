// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tier executors and response normalization.
//!
//! One executor per tier, all behind [`TierExecutor`]. Executors are
//! infallible: a failing generator or retriever degrades the result (missing
//! grounding, apology answer) instead of surfacing an error, so a routed
//! request always produces a [`TierResult`]. The normalizer then folds any
//! result shape into the uniform [`glucora_core::ResponseEnvelope`].

mod direct;
mod generation;
mod normalize;
mod research;
mod search;

use async_trait::async_trait;
use glucora_core::{EventSink, Question, RoutingDecision, TierResult};

pub use direct::DirectExecutor;
pub use normalize::normalize;
pub use research::ResearchExecutor;
pub use search::SearchExecutor;

/// Executor tuning shared by all tiers, decoupled from the configuration
/// crate so executors can be constructed directly in tests.
#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    /// Model for tier 1 and tier 2 answer synthesis.
    pub answer_model: String,
    /// Model for tier 3 research synthesis.
    pub research_model: String,
    /// Token budget for answer generation.
    pub max_tokens: u32,
    /// Snippets requested per source class.
    pub snippet_limit: usize,
    /// Routing confidence below which the direct tier adds lightweight
    /// search grounding.
    pub borderline_confidence: f32,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            answer_model: "gpt-4o".to_string(),
            research_model: "gpt-4o".to_string(),
            max_tokens: 1024,
            snippet_limit: 5,
            borderline_confidence: 0.45,
        }
    }
}

/// Executes one routed request and produces the tier's result shape.
#[async_trait]
pub trait TierExecutor: Send + Sync {
    /// Runs the tier strategy for `question`. Incremental output goes to
    /// `sink`; the returned result carries the complete answer either way.
    async fn execute(
        &self,
        question: &Question,
        system_prompt: &str,
        decision: &RoutingDecision,
        sink: &dyn EventSink,
    ) -> TierResult;
}
