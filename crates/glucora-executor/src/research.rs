// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tier 3: multi-source research synthesis.

use std::sync::Arc;

use async_trait::async_trait;
use glucora_core::{
    EventSink, EvidenceQuality, GenerateAdapter, GenerationRequest, Question, ResearchSummary,
    RetrieveAdapter, RoutingDecision, SourceClass, SourceRef, SourceSnippet, TierResult,
};
use tracing::warn;

use crate::generation::{grounding_block, push_profile_context, stream_answer};
use crate::{ExecutorOptions, TierExecutor};

/// Fans out to peer-reviewed literature, trial registries, and medical web
/// search concurrently, then synthesizes one answer over everything that
/// came back. Each source class can fail independently; the summary counts
/// whatever arrived and grades evidence accordingly.
pub struct ResearchExecutor {
    generator: Arc<dyn GenerateAdapter>,
    retriever: Arc<dyn RetrieveAdapter>,
    options: ExecutorOptions,
}

impl ResearchExecutor {
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

    async fn search_class(&self, query: &str, class: SourceClass) -> Vec<SourceSnippet> {
        match self
            .retriever
            .search(query, class, self.options.snippet_limit)
            .await
        {
            Ok(snippets) => snippets,
            Err(err) => {
                warn!(%class, error = %err, "source class search failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl TierExecutor for ResearchExecutor {
    async fn execute(
        &self,
        question: &Question,
        system_prompt: &str,
        _decision: &RoutingDecision,
        sink: &dyn EventSink,
    ) -> TierResult {
        let query = question.text.as_str();
        let (pubmed, trials, medical_web) = tokio::join!(
            self.search_class(query, SourceClass::Pubmed),
            self.search_class(query, SourceClass::ClinicalTrials),
            self.search_class(query, SourceClass::MedicalWeb),
        );

        let summary = summarize(&pubmed, &trials, &medical_web);

        let mut user_text = question.text.clone();
        push_profile_context(&mut user_text, question.profile.as_ref());
        for (heading, snippets) in [
            ("Peer-reviewed literature:", &pubmed),
            ("Clinical trial registry entries:", &trials),
            ("Medical web sources:", &medical_web),
        ] {
            if !snippets.is_empty() {
                user_text.push_str("\n\n");
                user_text.push_str(&grounding_block(heading, snippets));
            }
        }

        let sources: Vec<SourceRef> = pubmed
            .into_iter()
            .chain(trials)
            .chain(medical_web)
            .map(SourceRef::from)
            .collect();
        if !sources.is_empty() {
            sink.sources(&sources).await;
        }

        let request = GenerationRequest {
            model: self.options.research_model.clone(),
            system_prompt: Some(system_prompt.to_string()),
            user_text,
            max_tokens: self.options.max_tokens,
        };
        let answer = stream_answer(&self.generator, request, sink).await;

        TierResult::DeepResearch {
            answer,
            sources,
            summary,
        }
    }
}

fn summarize(
    pubmed: &[SourceSnippet],
    trials: &[SourceSnippet],
    medical_web: &[SourceSnippet],
) -> ResearchSummary {
    let pubmed_articles = pubmed.len() as u32;
    let clinical_trials = trials.len() as u32;
    let total_studies = pubmed_articles + clinical_trials;

    // Grade on study count alone; web sources corroborate but do not count
    // as studies.
    let evidence_quality = if total_studies >= 8 {
        EvidenceQuality::High
    } else if total_studies >= 3 {
        EvidenceQuality::Moderate
    } else {
        EvidenceQuality::Limited
    };

    ResearchSummary {
        total_studies,
        pubmed_articles,
        clinical_trials,
        arxiv_papers: None,
        medical_web_sources: Some(medical_web.len() as u32),
        evidence_quality,
    }
}

#[cfg(test)]
mod tests {
    use glucora_core::{NullSink, Tier};
    use glucora_test_utils::{FailingRetriever, MockGenerator, MockRetriever, snippet};

    use super::*;

    fn question() -> Question {
        Question {
            text: "what do recent studies say about tirzepatide?".to_string(),
            user_id: "alice".to_string(),
            profile: None,
        }
    }

    fn decision() -> RoutingDecision {
        RoutingDecision {
            tier: Tier::DeepResearch,
            reasoning: "explicit research cue".to_string(),
            confidence: 1.0,
        }
    }

    #[tokio::test]
    async fn aggregates_all_three_source_classes() {
        let generator = Arc::new(MockGenerator::new().with_response("synthesis"));
        let retriever = Arc::new(
            MockRetriever::new()
                .with_snippets(SourceClass::Pubmed, 4)
                .with_snippets(SourceClass::ClinicalTrials, 2)
                .with_snippets(SourceClass::MedicalWeb, 3),
        );
        let executor = ResearchExecutor::new(
            generator.clone(),
            retriever,
            ExecutorOptions::default(),
        );

        let result = executor
            .execute(&question(), "system", &decision(), &NullSink)
            .await;

        let TierResult::DeepResearch {
            sources, summary, ..
        } = result
        else {
            panic!("expected research result");
        };
        assert_eq!(sources.len(), 9);
        assert_eq!(summary.pubmed_articles, 4);
        assert_eq!(summary.clinical_trials, 2);
        assert_eq!(summary.medical_web_sources, Some(3));
        assert_eq!(summary.total_studies, 6);
        assert_eq!(summary.evidence_quality, EvidenceQuality::Moderate);

        let prompt = &generator.requests()[0].user_text;
        assert!(prompt.contains("Peer-reviewed literature:"));
        assert!(prompt.contains("Clinical trial registry entries:"));
        assert!(prompt.contains("Medical web sources:"));
    }

    #[tokio::test]
    async fn profile_context_is_carried_into_synthesis() {
        use glucora_core::{ConditionType, DiabetesProfile};

        let generator = Arc::new(MockGenerator::new().with_response("synthesis"));
        let retriever = Arc::new(MockRetriever::new().with_snippets(SourceClass::Pubmed, 1));
        let executor = ResearchExecutor::new(
            generator.clone(),
            retriever,
            ExecutorOptions::default(),
        );

        let mut q = question();
        q.profile = Some(DiabetesProfile {
            condition: ConditionType::Gestational,
            medications: Vec::new(),
        });
        executor.execute(&q, "system", &decision(), &NullSink).await;

        assert!(generator.requests()[0].user_text.contains("gestational diabetes"));
    }

    #[tokio::test]
    async fn all_sources_failing_degrades_to_limited_summary() {
        let generator = Arc::new(MockGenerator::new().with_response("best effort"));
        let executor = ResearchExecutor::new(
            generator,
            Arc::new(FailingRetriever::new()),
            ExecutorOptions::default(),
        );

        let result = executor
            .execute(&question(), "system", &decision(), &NullSink)
            .await;

        let TierResult::DeepResearch {
            answer,
            sources,
            summary,
        } = result
        else {
            panic!("expected research result");
        };
        assert_eq!(answer, "best effort");
        assert!(sources.is_empty());
        assert_eq!(summary.total_studies, 0);
        assert_eq!(summary.evidence_quality, EvidenceQuality::Limited);
    }

    #[test]
    fn evidence_grading_thresholds() {
        let many: Vec<_> = (1..=8).map(|i| snippet(SourceClass::Pubmed, i)).collect();
        assert_eq!(summarize(&many, &[], &[]).evidence_quality, EvidenceQuality::High);

        let some: Vec<_> = (1..=3).map(|i| snippet(SourceClass::Pubmed, i)).collect();
        assert_eq!(summarize(&some, &[], &[]).evidence_quality, EvidenceQuality::Moderate);

        assert_eq!(summarize(&[], &[], &[]).evidence_quality, EvidenceQuality::Limited);
    }
}
