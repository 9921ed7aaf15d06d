// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folds any tier result into the uniform response envelope.

use std::time::Duration;

use glucora_core::{
    RateLimitInfo, ResponseEnvelope, ResponseMetadata, RoutingDecision, TierResult,
};

/// Build the public response envelope from an executed tier result.
///
/// The match over [`TierResult`] is exhaustive on purpose: a new tier will
/// not compile until its envelope mapping is written. `tier` and
/// `processing_tier` both derive from the result's own tier, so they cannot
/// disagree.
pub fn normalize(
    decision: &RoutingDecision,
    result: TierResult,
    elapsed: Duration,
    model_used: &str,
    rate_limit: Option<RateLimitInfo>,
) -> ResponseEnvelope {
    let tier = result.tier();
    debug_assert_eq!(tier, decision.tier, "executor ran a different tier than routed");

    let (answer, sources, tools_used, research_summary) = match result {
        TierResult::Direct { answer } => (answer, Vec::new(), Vec::new(), None),
        TierResult::SearchAugmented {
            answer,
            sources,
            tools_used,
        } => (answer, sources, tools_used, None),
        TierResult::DeepResearch {
            answer,
            sources,
            summary,
        } => (
            answer,
            sources,
            vec![
                "pubmed_search".to_string(),
                "clinical_trials_search".to_string(),
                "medical_web_search".to_string(),
            ],
            Some(summary),
        ),
    };

    ResponseEnvelope {
        answer,
        tier,
        processing_tier: tier.processing_label(),
        sources,
        metadata: ResponseMetadata {
            processing_ms: elapsed.as_millis() as u64,
            model_used: model_used.to_string(),
            cost_tier: tier.cost_tier(),
            tools_used,
        },
        research_summary,
        rate_limit,
    }
}
