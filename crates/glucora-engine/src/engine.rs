// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The answer pipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glucora_config::GlucoraConfig;
use glucora_core::{
    CounterAdapter, EventSink, GenerateAdapter, GlucoraError, NullSink, Question,
    ResponseEnvelope, RetrieveAdapter, SessionId, Tier,
};
use glucora_executor::{
    DirectExecutor, ExecutorOptions, ResearchExecutor, SearchExecutor, TierExecutor, normalize,
};
use glucora_limiter::{DailyLimiter, FailPolicy, MemoryCounterStore};
use glucora_resolve::ReferenceResolver;
use glucora_router::{RouterOptions, TierRouter};
use tracing::{info, instrument};

use crate::session::{SessionOptions, SessionStore};

const MAX_QUESTION_CHARS: usize = 4000;
const MAX_USER_ID_CHARS: usize = 128;

/// Everything the engine needs beyond its adapters.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub router: RouterOptions,
    pub executor: ExecutorOptions,
    pub research_daily_limit: u32,
    pub fail_policy: FailPolicy,
    pub session: SessionOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            router: RouterOptions::default(),
            executor: ExecutorOptions::default(),
            research_daily_limit: 10,
            fail_policy: FailPolicy::default(),
            session: SessionOptions::default(),
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &GlucoraConfig) -> Self {
        Self {
            router: RouterOptions {
                classifier_model: config.generation.classifier_model.clone(),
                classify_timeout: Duration::from_secs(config.routing.classify_timeout_secs),
                classifier_max_tokens: config.routing.classifier_max_tokens,
            },
            executor: ExecutorOptions {
                answer_model: config.generation.answer_model.clone(),
                research_model: config.generation.research_model.clone(),
                max_tokens: config.generation.max_tokens,
                snippet_limit: config.search.snippet_limit,
                borderline_confidence: config.routing.borderline_confidence,
            },
            research_daily_limit: config.limits.research_daily_limit,
            fail_policy: match config.limits.fail_policy {
                glucora_config::model::FailPolicy::Open => FailPolicy::Open,
                glucora_config::model::FailPolicy::Closed => FailPolicy::Closed,
            },
            session: SessionOptions {
                max_turns: config.session.max_turns,
                idle_ttl: Duration::from_secs(config.session.idle_ttl_secs),
            },
        }
    }
}

/// A completed answer plus the session it belongs to.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub envelope: ResponseEnvelope,
    pub session_id: SessionId,
}

/// The full pipeline behind both transport surfaces.
pub struct AnswerEngine {
    router: TierRouter,
    resolver: ReferenceResolver,
    limiter: DailyLimiter,
    direct: DirectExecutor,
    search: SearchExecutor,
    research: ResearchExecutor,
    sessions: SessionStore,
    answer_model: String,
    research_model: String,
    research_daily_limit: u32,
}

impl AnswerEngine {
    pub fn new(
        generator: Arc<dyn GenerateAdapter>,
        retriever: Arc<dyn RetrieveAdapter>,
        counter: Arc<dyn CounterAdapter>,
        options: EngineOptions,
    ) -> Self {
        let executor_options = options.executor.clone();
        Self {
            router: TierRouter::new(Arc::clone(&generator), options.router),
            resolver: ReferenceResolver::new(),
            limiter: DailyLimiter::new(
                counter,
                options.research_daily_limit,
                options.fail_policy,
            ),
            direct: DirectExecutor::new(
                Arc::clone(&generator),
                Arc::clone(&retriever),
                executor_options.clone(),
            ),
            search: SearchExecutor::new(
                Arc::clone(&generator),
                Arc::clone(&retriever),
                executor_options.clone(),
            ),
            research: ResearchExecutor::new(generator, retriever, executor_options.clone()),
            sessions: SessionStore::new(options.session),
            answer_model: executor_options.answer_model,
            research_model: executor_options.research_model,
            research_daily_limit: options.research_daily_limit,
        }
    }

    /// Convenience constructor with an in-process counter store.
    pub fn with_memory_counter(
        generator: Arc<dyn GenerateAdapter>,
        retriever: Arc<dyn RetrieveAdapter>,
        options: EngineOptions,
    ) -> Self {
        Self::new(
            generator,
            retriever,
            Arc::new(MemoryCounterStore::new()),
            options,
        )
    }

    /// Answer without incremental delivery.
    pub async fn answer(
        &self,
        question: Question,
        session_id: Option<SessionId>,
    ) -> Result<AnswerOutcome, GlucoraError> {
        self.answer_with_sink(question, session_id, &NullSink).await
    }

    /// Run the full pipeline, forwarding incremental output to `sink`.
    #[instrument(skip_all, fields(user_id = %question.user_id))]
    pub async fn answer_with_sink(
        &self,
        question: Question,
        session_id: Option<SessionId>,
        sink: &dyn EventSink,
    ) -> Result<AnswerOutcome, GlucoraError> {
        validate(&question)?;

        let (session_id, turns) = self.sessions.resume(session_id.as_ref());
        let resolution = self.resolver.resolve(&question.text, &turns);

        let decision = self
            .router
            .route(&question.text, question.profile.as_ref())
            .await;

        // Admission is checked after routing so only real research requests
        // consume from the daily budget.
        let rate_limit = if decision.tier == Tier::DeepResearch {
            let admission = self.limiter.admit(&question.user_id).await;
            if !admission.allowed {
                return Err(GlucoraError::RateLimited {
                    remaining: admission.remaining,
                    reset_at: admission.reset_at,
                });
            }
            Some(admission.rate_limit_info())
        } else {
            None
        };

        let system_prompt = glucora_prompt::assemble(decision.tier);

        let mut executed_question = question.clone();
        if resolution.has_references() {
            executed_question.text =
                format!("{}\n\n{}", resolution.question, resolution.guidance);
        }

        let started = Instant::now();
        let executor: &dyn TierExecutor = match decision.tier {
            Tier::Direct => &self.direct,
            Tier::SearchAugmented => &self.search,
            Tier::DeepResearch => &self.research,
        };
        let result = executor
            .execute(&executed_question, &system_prompt, &decision, sink)
            .await;
        let elapsed = started.elapsed();

        let model_used = match decision.tier {
            Tier::DeepResearch => &self.research_model,
            _ => &self.answer_model,
        };
        let envelope = normalize(&decision, result, elapsed, model_used, rate_limit);

        self.sessions
            .record_turn(&session_id, question.text, envelope.answer.clone());

        info!(
            tier = envelope.tier.number(),
            processing_ms = envelope.metadata.processing_ms,
            sources = envelope.sources.len(),
            "answered question"
        );

        Ok(AnswerOutcome {
            envelope,
            session_id,
        })
    }

    /// Daily research usage for the usage endpoint.
    pub async fn usage(
        &self,
        user_id: &str,
    ) -> Result<glucora_core::UsageSnapshot, GlucoraError> {
        if user_id.trim().is_empty() {
            return Err(GlucoraError::InvalidInput("user_id is required".to_string()));
        }
        self.limiter.usage(user_id).await
    }

    /// Configured research-tier daily limit, surfaced by the health endpoint.
    pub fn research_daily_limit(&self) -> u32 {
        self.research_daily_limit
    }
}

fn validate(question: &Question) -> Result<(), GlucoraError> {
    if question.text.trim().is_empty() {
        return Err(GlucoraError::InvalidInput("question is required".to_string()));
    }
    if question.text.chars().count() > MAX_QUESTION_CHARS {
        return Err(GlucoraError::InvalidInput(format!(
            "question exceeds {MAX_QUESTION_CHARS} characters"
        )));
    }
    if question.user_id.trim().is_empty() {
        return Err(GlucoraError::InvalidInput("user_id is required".to_string()));
    }
    if question.user_id.chars().count() > MAX_USER_ID_CHARS {
        return Err(GlucoraError::InvalidInput(format!(
            "user_id exceeds {MAX_USER_ID_CHARS} characters"
        )));
    }
    Ok(())
}
