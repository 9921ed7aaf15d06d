// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tier 1: direct model answer.

use std::sync::Arc;

use async_trait::async_trait;
use glucora_core::{
    EventSink, GenerateAdapter, GenerationRequest, Question, RetrieveAdapter, RoutingDecision,
    SourceClass, TierResult,
};
use tracing::debug;

use crate::generation::{grounding_block, push_profile_context, stream_answer};
use crate::{ExecutorOptions, TierExecutor};

/// Snippets fetched for a borderline-confidence direct answer.
const BORDERLINE_SNIPPETS: usize = 2;

/// Answers from model knowledge alone, with one hedge: when routing
/// confidence is borderline the question might actually have needed fresh
/// data, so a small web search is folded into the prompt as insurance. The
/// result stays tier-1 shaped either way; grounding snippets are prompt
/// context, not citations.
pub struct DirectExecutor {
    generator: Arc<dyn GenerateAdapter>,
    retriever: Arc<dyn RetrieveAdapter>,
    options: ExecutorOptions,
}

impl DirectExecutor {
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
impl TierExecutor for DirectExecutor {
    async fn execute(
        &self,
        question: &Question,
        system_prompt: &str,
        decision: &RoutingDecision,
        sink: &dyn EventSink,
    ) -> TierResult {
        let mut user_text = question.text.clone();
        push_profile_context(&mut user_text, question.profile.as_ref());

        if decision.confidence < self.options.borderline_confidence {
            // Tolerate retrieval failure; the plain answer still stands.
            match self
                .retriever
                .search(&question.text, SourceClass::Web, BORDERLINE_SNIPPETS)
                .await
            {
                Ok(snippets) if !snippets.is_empty() => {
                    debug!(
                        confidence = decision.confidence,
                        snippets = snippets.len(),
                        "borderline routing, adding search grounding"
                    );
                    user_text.push_str("\n\n");
                    user_text.push_str(&grounding_block(
                        "Possibly relevant current information:",
                        &snippets,
                    ));
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(error = %err, "borderline grounding search failed, continuing without");
                }
            }
        }

        let request = GenerationRequest {
            model: self.options.answer_model.clone(),
            system_prompt: Some(system_prompt.to_string()),
            user_text,
            max_tokens: self.options.max_tokens,
        };
        let answer = stream_answer(&self.generator, request, sink).await;
        TierResult::Direct { answer }
    }
}

#[cfg(test)]
mod tests {
    use glucora_core::{NullSink, Tier};
    use glucora_test_utils::{FailingRetriever, MockGenerator, MockRetriever};

    use super::*;

    fn question() -> Question {
        Question {
            text: "what is a normal fasting glucose range?".to_string(),
            user_id: "alice".to_string(),
            profile: None,
        }
    }

    fn decision(confidence: f32) -> RoutingDecision {
        RoutingDecision {
            tier: Tier::Direct,
            reasoning: "test".to_string(),
            confidence,
        }
    }

    #[tokio::test]
    async fn confident_routing_skips_search() {
        let generator = Arc::new(MockGenerator::new().with_response("Between 70 and 100 mg/dl."));
        let retriever = Arc::new(MockRetriever::new().with_snippets(SourceClass::Web, 3));
        let executor = DirectExecutor::new(
            generator.clone(),
            retriever.clone(),
            ExecutorOptions::default(),
        );

        let result = executor
            .execute(&question(), "system", &decision(0.9), &NullSink)
            .await;

        assert!(matches!(result, TierResult::Direct { .. }));
        assert!(retriever.queries().is_empty());
    }

    #[tokio::test]
    async fn borderline_routing_grounds_the_prompt() {
        let generator = Arc::new(MockGenerator::new().with_response("answer"));
        let retriever = Arc::new(MockRetriever::new().with_snippets(SourceClass::Web, 3));
        let executor = DirectExecutor::new(
            generator.clone(),
            retriever.clone(),
            ExecutorOptions::default(),
        );

        executor
            .execute(&question(), "system", &decision(0.2), &NullSink)
            .await;

        assert_eq!(retriever.queries().len(), 1);
        let requests = generator.requests();
        assert!(requests[0].user_text.contains("Possibly relevant current information:"));
    }

    #[tokio::test]
    async fn profile_context_reaches_the_prompt() {
        use glucora_core::{ConditionType, DiabetesProfile};

        let generator = Arc::new(MockGenerator::new().with_response("tailored answer"));
        let executor = DirectExecutor::new(
            generator.clone(),
            Arc::new(MockRetriever::new()),
            ExecutorOptions::default(),
        );

        let mut q = question();
        q.profile = Some(DiabetesProfile {
            condition: ConditionType::Type1,
            medications: vec!["insulin glargine".to_string()],
        });
        executor.execute(&q, "system", &decision(0.9), &NullSink).await;

        let prompt = &generator.requests()[0].user_text;
        assert!(prompt.contains("type 1 diabetes"));
        assert!(prompt.contains("insulin glargine"));
    }

    #[tokio::test]
    async fn borderline_search_failure_is_tolerated() {
        let generator = Arc::new(MockGenerator::new().with_response("answer"));
        let executor = DirectExecutor::new(
            generator.clone(),
            Arc::new(FailingRetriever::new()),
            ExecutorOptions::default(),
        );

        let result = executor
            .execute(&question(), "system", &decision(0.2), &NullSink)
            .await;

        let TierResult::Direct { answer } = result else {
            panic!("expected direct result");
        };
        assert_eq!(answer, "answer");
    }
}
