// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tier 2: search-grounded answer.

use std::sync::Arc;

use async_trait::async_trait;
use glucora_core::{
    EventSink, GenerateAdapter, GenerationRequest, Question, RetrieveAdapter, RoutingDecision,
    SourceClass, SourceRef, TierResult,
};
use tracing::warn;

use crate::generation::{grounding_block, push_profile_context, stream_answer};
use crate::{ExecutorOptions, TierExecutor};

/// Runs one web search, folds the snippets into the prompt, and attaches
/// them as structured citations. The retrieval query carries the user's
/// condition when a profile was supplied, so results match their situation.
/// A failed search degrades to an ungrounded answer with empty sources
/// rather than an error.
pub struct SearchExecutor {
    generator: Arc<dyn GenerateAdapter>,
    retriever: Arc<dyn RetrieveAdapter>,
    options: ExecutorOptions,
}

impl SearchExecutor {
    pub fn new(
        generator: Arc<dyn GenerateAdapter>,
        retriever: Arc<dyn RetrieveAdapter>,
        options: ExecutorOptions,
    ) -> Self {
        Self {
            generator,
            retriever,
            options,
        }
    }
}

#[async_trait]
impl TierExecutor for SearchExecutor {
    async fn execute(
        &self,
        question: &Question,
        system_prompt: &str,
        _decision: &RoutingDecision,
        sink: &dyn EventSink,
    ) -> TierResult {
        let query = match &question.profile {
            Some(profile) => format!("{} ({})", question.text, profile.condition.label()),
            None => question.text.clone(),
        };
        let (snippets, tools_used) = match self
            .retriever
            .search(&query, SourceClass::Web, self.options.snippet_limit)
            .await
        {
            Ok(snippets) => (snippets, vec!["web_search".to_string()]),
            Err(err) => {
                warn!(error = %err, "web search failed, answering without grounding");
                (Vec::new(), Vec::new())
            }
        };

        let mut user_text = question.text.clone();
        push_profile_context(&mut user_text, question.profile.as_ref());
        if !snippets.is_empty() {
            user_text.push_str("\n\n");
            user_text.push_str(&grounding_block("Search results:", &snippets));
        }

        let sources: Vec<SourceRef> = snippets.into_iter().map(SourceRef::from).collect();
        // Citations are known before generation starts; send them ahead of
        // the token stream so clients can render them immediately.
        if !sources.is_empty() {
            sink.sources(&sources).await;
        }

        let request = GenerationRequest {
            model: self.options.answer_model.clone(),
            system_prompt: Some(system_prompt.to_string()),
            user_text,
            max_tokens: self.options.max_tokens,
        };
        let answer = stream_answer(&self.generator, request, sink).await;

        TierResult::SearchAugmented {
            answer,
            sources,
            tools_used,
        }
    }
}
