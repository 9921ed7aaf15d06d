// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Glucora engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a streaming conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// One of three escalating processing strategies, ordered by cost and latency.
///
/// Serialized as its tier number; invalid numbers are rejected at the
/// deserialization boundary, so downstream code never sees an out-of-range tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    /// Tier 1: single model call, no external retrieval.
    Direct,
    /// Tier 2: web-search-grounded answer with citations.
    SearchAugmented,
    /// Tier 3: multi-source deep research. Rate limited per user per day.
    DeepResearch,
}

impl Tier {
    /// The numeric tier as exposed in the public response envelope.
    pub fn number(self) -> u8 {
        match self {
            Tier::Direct => 1,
            Tier::SearchAugmented => 2,
            Tier::DeepResearch => 3,
        }
    }

    /// The processing label paired with this tier (1↔MODEL, 2↔SEARCH, 3↔RESEARCH).
    pub fn processing_label(self) -> ProcessingTier {
        match self {
            Tier::Direct => ProcessingTier::Model,
            Tier::SearchAugmented => ProcessingTier::Search,
            Tier::DeepResearch => ProcessingTier::Research,
        }
    }

    /// The cost class paired with this tier (1→low, 2→medium, 3→high).
    pub fn cost_tier(self) -> CostTier {
        match self {
            Tier::Direct => CostTier::Low,
            Tier::SearchAugmented => CostTier::Medium,
            Tier::DeepResearch => CostTier::High,
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> u8 {
        tier.number()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Tier::Direct),
            2 => Ok(Tier::SearchAugmented),
            3 => Ok(Tier::DeepResearch),
            other => Err(format!("tier must be 1, 2, or 3, got {other}")),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Public label for the processing strategy used for a response.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessingTier {
    Model,
    Search,
    Research,
}

/// Cost class of a tier as surfaced in response metadata.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Low,
    Medium,
    High,
}

/// Diabetes condition type from the caller-supplied profile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    Type1,
    Type2,
    Gestational,
    Prediabetes,
    Other,
}

impl ConditionType {
    /// Human-readable form used in prompts and retrieval queries.
    pub fn label(self) -> &'static str {
        match self {
            ConditionType::Type1 => "type 1 diabetes",
            ConditionType::Type2 => "type 2 diabetes",
            ConditionType::Gestational => "gestational diabetes",
            ConditionType::Prediabetes => "prediabetes",
            ConditionType::Other => "diabetes",
        }
    }
}

/// Fixed-shape medical profile optionally attached to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiabetesProfile {
    /// Condition type (type 1, type 2, gestational, ...).
    pub condition: ConditionType,
    /// Current medication list, free-text names.
    #[serde(default)]
    pub medications: Vec<String>,
}

/// Immutable per-request input: free text plus user identity and optional profile.
#[derive(Debug, Clone)]
pub struct Question {
    /// The question text as submitted (or as annotated by the reference resolver).
    pub text: String,
    /// Opaque caller-supplied user identity, used only for rate limiting.
    pub user_id: String,
    /// Optional medical profile for answer personalization.
    pub profile: Option<DiabetesProfile>,
}

/// Produced once per request by the tier router; immutable thereafter.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    /// The selected processing tier.
    pub tier: Tier,
    /// Short textual justification, also present on fallback paths.
    pub reasoning: String,
    /// Advisory confidence in the classification (0.0-1.0).
    pub confidence: f32,
}

/// Class of an external source a snippet or citation came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SourceClass {
    Pubmed,
    ClinicalTrials,
    MedicalWeb,
    Web,
}

/// A ranked snippet returned by the retrieval capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSnippet {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub class: SourceClass,
}

/// A source citation attached to a response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub class: SourceClass,
}

impl From<SourceSnippet> for SourceRef {
    fn from(s: SourceSnippet) -> Self {
        SourceRef {
            title: s.title,
            url: s.url,
            class: s.class,
        }
    }
}

/// Coarse evidence quality grade for a deep-research pass.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EvidenceQuality {
    High,
    Moderate,
    Limited,
}

/// Per-source-class aggregation produced by the deep-research executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSummary {
    pub total_studies: u32,
    pub pubmed_articles: u32,
    pub clinical_trials: u32,
    /// Preprint counts; populated only when an arxiv-class retriever is wired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arxiv_papers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_web_sources: Option<u32>,
    pub evidence_quality: EvidenceQuality,
}

impl ResearchSummary {
    /// An all-zero summary with limited evidence, used for degraded results.
    pub fn zeroed() -> Self {
        ResearchSummary {
            total_studies: 0,
            pubmed_articles: 0,
            clinical_trials: 0,
            arxiv_papers: None,
            medical_web_sources: None,
            evidence_quality: EvidenceQuality::Limited,
        }
    }
}

/// Tagged union over the three executor result shapes.
///
/// Exactly one variant is produced per request. The normalizer matches
/// exhaustively, so adding a tier is a compile-time-checked change.
#[derive(Debug, Clone)]
pub enum TierResult {
    /// Tier 1: plain model answer.
    Direct { answer: String },
    /// Tier 2: search-grounded answer with citations and a tool audit trail.
    SearchAugmented {
        answer: String,
        sources: Vec<SourceRef>,
        tools_used: Vec<String>,
    },
    /// Tier 3: multi-source research synthesis.
    DeepResearch {
        answer: String,
        sources: Vec<SourceRef>,
        summary: ResearchSummary,
    },
}

impl TierResult {
    /// The tier this result shape belongs to.
    pub fn tier(&self) -> Tier {
        match self {
            TierResult::Direct { .. } => Tier::Direct,
            TierResult::SearchAugmented { .. } => Tier::SearchAugmented,
            TierResult::DeepResearch { .. } => Tier::DeepResearch,
        }
    }
}

/// Rate-limit detail attached to research-tier responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    /// Admissions remaining today for this user.
    pub remaining: u32,
    /// Next UTC day boundary, when the counter resets.
    pub reset_at: DateTime<Utc>,
    /// True when the counter store failed and the request was admitted fail-open.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

/// Read-only usage snapshot for the usage query endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub count: u32,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

/// Timing and provenance metadata attached to every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Wall-clock processing time in milliseconds.
    pub processing_ms: u64,
    /// Model identifier that produced the answer.
    pub model_used: String,
    /// Cost class of the executed tier.
    pub cost_tier: CostTier,
    /// External tools invoked while producing the answer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools_used: Vec<String>,
}

/// The normalized public output shape, uniform across all three tiers.
///
/// Invariant: `tier` and `processing_tier` always agree (1↔MODEL, 2↔SEARCH,
/// 3↔RESEARCH); both are derived from the same [`Tier`] value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub answer: String,
    pub tier: Tier,
    pub processing_tier: ProcessingTier,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    pub metadata: ResponseMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_summary: Option<ResearchSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitInfo>,
}

/// One question/answer pair in a streaming session's bounded turn window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of capability adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Generation,
    Retrieval,
    Counter,
}

/// A request to the generation capability.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model identifier.
    pub model: String,
    /// Optional system prompt text.
    pub system_prompt: Option<String>,
    /// User-visible request text (question plus any grounding context).
    pub user_text: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_number_round_trip() {
        for tier in [Tier::Direct, Tier::SearchAugmented, Tier::DeepResearch] {
            assert_eq!(Tier::try_from(tier.number()).unwrap(), tier);
        }
    }

    #[test]
    fn tier_rejects_out_of_range() {
        assert!(Tier::try_from(0).is_err());
        assert!(Tier::try_from(4).is_err());
    }

    #[test]
    fn tier_label_mapping_is_total() {
        assert_eq!(Tier::Direct.processing_label(), ProcessingTier::Model);
        assert_eq!(
            Tier::SearchAugmented.processing_label(),
            ProcessingTier::Search
        );
        assert_eq!(
            Tier::DeepResearch.processing_label(),
            ProcessingTier::Research
        );
    }

    #[test]
    fn tier_cost_mapping() {
        assert_eq!(Tier::Direct.cost_tier(), CostTier::Low);
        assert_eq!(Tier::SearchAugmented.cost_tier(), CostTier::Medium);
        assert_eq!(Tier::DeepResearch.cost_tier(), CostTier::High);
    }

    #[test]
    fn tier_serializes_as_number() {
        let json = serde_json::to_string(&Tier::SearchAugmented).unwrap();
        assert_eq!(json, "2");
        let parsed: Tier = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Tier::DeepResearch);
        assert!(serde_json::from_str::<Tier>("9").is_err());
    }

    #[test]
    fn processing_tier_display_uppercase() {
        assert_eq!(ProcessingTier::Model.to_string(), "MODEL");
        assert_eq!(ProcessingTier::Search.to_string(), "SEARCH");
        assert_eq!(ProcessingTier::Research.to_string(), "RESEARCH");
    }

    #[test]
    fn tier_result_tier_agrees_with_variant() {
        let direct = TierResult::Direct {
            answer: "a".into(),
        };
        assert_eq!(direct.tier(), Tier::Direct);

        let research = TierResult::DeepResearch {
            answer: "a".into(),
            sources: vec![],
            summary: ResearchSummary::zeroed(),
        };
        assert_eq!(research.tier(), Tier::DeepResearch);
    }

    #[test]
    fn source_ref_serializes_class_as_type() {
        let src = SourceRef {
            title: "t".into(),
            url: "https://example.org".into(),
            class: SourceClass::Pubmed,
        };
        let json = serde_json::to_string(&src).unwrap();
        assert!(json.contains("\"type\":\"pubmed\""));
    }

    #[test]
    fn envelope_round_trips_through_json() {
        let envelope = ResponseEnvelope {
            answer: "answer".into(),
            tier: Tier::SearchAugmented,
            processing_tier: Tier::SearchAugmented.processing_label(),
            sources: vec![],
            metadata: ResponseMetadata {
                processing_ms: 12,
                model_used: "gpt-4o-mini".into(),
                cost_tier: CostTier::Medium,
                tools_used: vec!["web_search".into()],
            },
            research_summary: None,
            rate_limit: None,
        };
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("\"tier\":2"));
        assert!(json.contains("\"processing_tier\":\"SEARCH\""));
        let parsed: ResponseEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn zeroed_summary_is_all_zero() {
        let summary = ResearchSummary::zeroed();
        assert_eq!(summary.total_studies, 0);
        assert_eq!(summary.pubmed_articles, 0);
        assert_eq!(summary.clinical_trials, 0);
        assert_eq!(summary.evidence_quality, EvidenceQuality::Limited);
    }

    #[test]
    fn condition_labels_are_prompt_ready() {
        assert_eq!(ConditionType::Type1.label(), "type 1 diabetes");
        assert_eq!(ConditionType::Gestational.label(), "gestational diabetes");
        assert_eq!(ConditionType::Other.label(), "diabetes");
    }

    #[test]
    fn condition_type_serde_snake_case() {
        let json = serde_json::to_string(&ConditionType::Type1).unwrap();
        assert_eq!(json, "\"type1\"");
        let parsed: ConditionType = serde_json::from_str("\"gestational\"").unwrap();
        assert_eq!(parsed, ConditionType::Gestational);
    }
}
