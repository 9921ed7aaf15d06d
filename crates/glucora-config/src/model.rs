// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Glucora answer engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Glucora configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GlucoraConfig {
    /// Assistant identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Generation capability (OpenAI-compatible API) settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Retrieval capability settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Tier routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Research-tier rate limit settings.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Streaming session window settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Assistant identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "glucora".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token for `/v1/*` routes. `None` leaves the gateway open
    /// (for deployments behind a trusted proxy).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

/// Generation capability configuration (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// API key. `None` requires the `GLUCORA_GENERATION_API_KEY` env var.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the chat completions endpoint.
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,

    /// Model used for tier 1 and tier 2 answers.
    #[serde(default = "default_answer_model")]
    pub answer_model: String,

    /// Model used for tier 3 research synthesis.
    #[serde(default = "default_research_model")]
    pub research_model: String,

    /// Low-latency model used for the routing classification call.
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,

    /// Maximum tokens to generate per answer.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Bound on every outbound generation call, in seconds.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_generation_base_url(),
            answer_model: default_answer_model(),
            research_model: default_research_model(),
            classifier_model: default_classifier_model(),
            max_tokens: default_max_tokens(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

fn default_generation_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_answer_model() -> String {
    "gpt-4o".to_string()
}

fn default_research_model() -> String {
    "gpt-4o".to_string()
}

fn default_classifier_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_call_timeout_secs() -> u64 {
    30
}

/// Retrieval capability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// API key for the web search backend. `None` disables web-class search.
    #[serde(default)]
    pub web_api_key: Option<String>,

    /// Base URL of the web search backend.
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,

    /// Base URL of the PubMed E-utilities endpoint.
    #[serde(default = "default_pubmed_base_url")]
    pub pubmed_base_url: String,

    /// Base URL of the ClinicalTrials.gov v2 API.
    #[serde(default = "default_trials_base_url")]
    pub trials_base_url: String,

    /// Maximum snippets requested per source class.
    #[serde(default = "default_snippet_limit")]
    pub snippet_limit: usize,

    /// Bound on every outbound retrieval call, in seconds.
    #[serde(default = "default_search_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            web_api_key: None,
            web_base_url: default_web_base_url(),
            pubmed_base_url: default_pubmed_base_url(),
            trials_base_url: default_trials_base_url(),
            snippet_limit: default_snippet_limit(),
            call_timeout_secs: default_search_timeout_secs(),
        }
    }
}

fn default_web_base_url() -> String {
    "https://api.exa.ai/search".to_string()
}

fn default_pubmed_base_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string()
}

fn default_trials_base_url() -> String {
    "https://clinicaltrials.gov/api/v2".to_string()
}

fn default_snippet_limit() -> usize {
    5
}

fn default_search_timeout_secs() -> u64 {
    15
}

/// Tier routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Bound on the classification call, in seconds.
    #[serde(default = "default_classify_timeout_secs")]
    pub classify_timeout_secs: u64,

    /// Routing confidence below which the direct executor augments its
    /// answer with one lightweight web search.
    #[serde(default = "default_borderline_confidence")]
    pub borderline_confidence: f32,

    /// Maximum tokens for the classification call output.
    #[serde(default = "default_classifier_max_tokens")]
    pub classifier_max_tokens: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            classify_timeout_secs: default_classify_timeout_secs(),
            borderline_confidence: default_borderline_confidence(),
            classifier_max_tokens: default_classifier_max_tokens(),
        }
    }
}

fn default_classify_timeout_secs() -> u64 {
    5
}

fn default_borderline_confidence() -> f32 {
    0.45
}

fn default_classifier_max_tokens() -> u32 {
    64
}

/// Policy when the counter store backing the rate limiter is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailPolicy {
    /// Admit the request, flag the response as degraded, log a warning.
    Open,
    /// Deny the request.
    Closed,
}

/// Research-tier rate limit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Research-tier admissions per user per UTC day.
    #[serde(default = "default_research_daily_limit")]
    pub research_daily_limit: u32,

    /// Behavior when the counter store fails. Fail-open trades limiter
    /// precision for availability; fail-closed trades the other way.
    #[serde(default = "default_fail_policy")]
    pub fail_policy: FailPolicy,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            research_daily_limit: default_research_daily_limit(),
            fail_policy: default_fail_policy(),
        }
    }
}

fn default_research_daily_limit() -> u32 {
    10
}

fn default_fail_policy() -> FailPolicy {
    FailPolicy::Open
}

/// Streaming session window configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Maximum turns kept per session window.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Idle seconds before a session window expires.
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            idle_ttl_secs: default_idle_ttl_secs(),
        }
    }
}

fn default_max_turns() -> usize {
    10
}

fn default_idle_ttl_secs() -> u64 {
    1800
}
