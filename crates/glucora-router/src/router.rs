// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-backed tier classification with lexical pre-emption.

use std::sync::Arc;
use std::time::Duration;

use glucora_core::{DiabetesProfile, GenerateAdapter, GenerationRequest, RoutingDecision, Tier};
use tracing::{debug, warn};

use crate::cues::{has_research_cue, is_simple_exchange};

/// Router tuning, decoupled from the configuration crate so the router can
/// be constructed directly in tests.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Model used for the classification call.
    pub classifier_model: String,
    /// Hard deadline for the classification call.
    pub classify_timeout: Duration,
    /// Token budget for the classifier reply; the expected reply is one line.
    pub classifier_max_tokens: u32,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            classifier_model: "gpt-4o-mini".to_string(),
            classify_timeout: Duration::from_secs(5),
            classifier_max_tokens: 64,
        }
    }
}

const CLASSIFIER_SYSTEM_PROMPT: &str = "\
You route diabetes questions to a processing tier. Reply with exactly one \
line of the form `tier|confidence|reason`, where tier is 1, 2, or 3.

Tier 1: answerable from established diabetes knowledge.
Tier 2: needs current information from a web search (prices, availability, \
recent guideline changes, news).
Tier 3: explicitly asks for research evidence, studies, or clinical trials.

Examples:
Q: what is a normal fasting glucose range?
A: 1|0.95|established knowledge
Q: how much does a dexcom g7 sensor cost right now?
A: 2|0.9|current pricing
Q: what do recent studies say about ozempic for type 1?
A: 3|0.9|asks for study evidence
When torn between two tiers, pick the lower one.";

/// Routes questions to a processing tier.
///
/// `route` is infallible: lexical cues short-circuit, and any classifier
/// failure degrades to the direct tier rather than surfacing an error.
pub struct TierRouter {
    generator: Arc<dyn GenerateAdapter>,
    options: RouterOptions,
}

impl TierRouter {
    pub fn new(generator: Arc<dyn GenerateAdapter>, options: RouterOptions) -> Self {
        Self { generator, options }
    }

    pub async fn route(
        &self,
        question: &str,
        profile: Option<&DiabetesProfile>,
    ) -> RoutingDecision {
        if is_simple_exchange(question) {
            return RoutingDecision {
                tier: Tier::Direct,
                reasoning: "simple exchange".to_string(),
                confidence: 1.0,
            };
        }

        let research_cue = has_research_cue(question);
        if research_cue {
            return RoutingDecision {
                tier: Tier::DeepResearch,
                reasoning: "explicit research cue".to_string(),
                confidence: 1.0,
            };
        }

        let mut user_text = question.to_string();
        if let Some(profile) = profile {
            // The asker's condition can tip a borderline classification
            // (guideline questions read differently for gestational diabetes).
            user_text.push_str(&format!("\n(asker has {})", profile.condition.label()));
        }
        let request = GenerationRequest {
            model: self.options.classifier_model.clone(),
            system_prompt: Some(CLASSIFIER_SYSTEM_PROMPT.to_string()),
            user_text,
            max_tokens: self.options.classifier_max_tokens,
        };

        let reply = tokio::time::timeout(
            self.options.classify_timeout,
            self.generator.generate(request),
        )
        .await;

        let decision = match reply {
            Ok(Ok(raw)) => match parse_classification(&raw) {
                Some(parsed) => demote_uncued_research(parsed),
                None => {
                    warn!(reply = %raw, "unparseable classifier reply, taking direct tier");
                    fallback("classifier reply unparseable")
                }
            },
            Ok(Err(err)) => {
                warn!(error = %err, "classifier call failed, taking direct tier");
                fallback("classifier unavailable")
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.options.classify_timeout.as_millis() as u64,
                    "classifier timed out, taking direct tier"
                );
                fallback("classifier timed out")
            }
        };

        debug!(
            tier = decision.tier.number(),
            confidence = decision.confidence,
            reasoning = %decision.reasoning,
            "routed question"
        );
        decision
    }
}

fn fallback(cause: &str) -> RoutingDecision {
    RoutingDecision {
        tier: Tier::Direct,
        reasoning: format!("fallback: {cause}"),
        confidence: 0.0,
    }
}

/// The research tier is reserved for questions that ask for it in so many
/// words. A classifier vote for tier 3 on an uncued question becomes tier 2,
/// which still grounds the answer in a live search.
fn demote_uncued_research(decision: RoutingDecision) -> RoutingDecision {
    if decision.tier == Tier::DeepResearch {
        RoutingDecision {
            tier: Tier::SearchAugmented,
            reasoning: format!("{} (no explicit research cue)", decision.reasoning),
            confidence: decision.confidence,
        }
    } else {
        decision
    }
}

/// Lenient parse of a `tier|confidence|reason` line.
///
/// The tier field tolerates surrounding prose; when it names more than one
/// tier the cheapest one wins. A reply with no usable tier digit returns
/// `None`.
fn parse_classification(raw: &str) -> Option<RoutingDecision> {
    let mut parts = raw.splitn(3, '|');
    let tier_part = parts.next().unwrap_or(raw);
    let tier = tier_part
        .chars()
        .filter_map(|c| c.to_digit(10))
        .filter_map(|d| Tier::try_from(d as u8).ok())
        .min_by_key(|tier| tier.number())?;
    let confidence = parts
        .next()
        .and_then(|p| p.trim().parse::<f32>().ok())
        .unwrap_or(0.5)
        .clamp(0.0, 1.0);
    let reasoning = parts
        .next()
        .map(|p| p.trim().trim_end_matches('\n'))
        .filter(|p| !p.is_empty())
        .unwrap_or("model classification")
        .to_string();

    Some(RoutingDecision {
        tier,
        reasoning,
        confidence,
    })
}
