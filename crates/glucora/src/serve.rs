// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `glucora serve` command implementation.
//!
//! Wires the OpenAI-compatible generation adapter, the medical retrieval
//! adapter, and the in-process rate-limit counter into an [`AnswerEngine`],
//! then serves the HTTP gateway until the process is interrupted.

use std::sync::Arc;
use std::time::Duration;

use glucora_config::GlucoraConfig;
use glucora_core::{CapabilityAdapter, GlucoraError, HealthStatus};
use glucora_engine::{AnswerEngine, EngineOptions};
use glucora_gateway::auth::AuthConfig;
use glucora_gateway::{GatewayState, ServerOptions, start_server};
use glucora_limiter::MemoryCounterStore;
use glucora_openai::{OpenAiGenerator, OpenAiOptions};
use glucora_search::{MedicalRetriever, SearchOptions};
use tracing::{info, warn};

/// Environment variable consulted when `generation.api_key` is unset.
const API_KEY_ENV: &str = "GLUCORA_GENERATION_API_KEY";

/// Runs the `glucora serve` command.
pub async fn run_serve(config: GlucoraConfig) -> Result<(), GlucoraError> {
    init_tracing(&config.agent.log_level);

    info!(agent = %config.agent.name, "starting glucora serve");

    let api_key = config
        .generation
        .api_key
        .clone()
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .ok_or_else(|| {
            GlucoraError::Config(format!(
                "no generation API key: set generation.api_key or the {API_KEY_ENV} environment variable"
            ))
        })?;

    let generator = Arc::new(OpenAiGenerator::new(OpenAiOptions {
        api_key,
        base_url: config.generation.base_url.clone(),
        call_timeout: Duration::from_secs(config.generation.call_timeout_secs),
    })?);

    if config.search.web_api_key.is_none() {
        warn!("no web search API key configured: web-grounded answers will degrade");
    }
    let retriever = Arc::new(MedicalRetriever::new(SearchOptions {
        web_api_key: config.search.web_api_key.clone(),
        web_base_url: config.search.web_base_url.clone(),
        pubmed_base_url: config.search.pubmed_base_url.clone(),
        trials_base_url: config.search.trials_base_url.clone(),
        call_timeout: Duration::from_secs(config.search.call_timeout_secs),
    })?);
    let counter = Arc::new(MemoryCounterStore::new());

    let adapters: [Arc<dyn CapabilityAdapter>; 3] = [
        generator.clone(),
        retriever.clone(),
        counter.clone(),
    ];
    announce_adapters(&adapters).await;

    let engine = AnswerEngine::new(
        generator,
        retriever,
        counter,
        EngineOptions::from_config(&config),
    );

    let state = GatewayState {
        engine: Arc::new(engine),
        auth: AuthConfig {
            bearer_token: config.server.bearer_token,
        },
    };
    let options = ServerOptions {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    tokio::select! {
        result = start_server(&options, state) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
            shutdown_adapters(&adapters).await;
            Ok(())
        }
    }
}

/// Health-probe every adapter at startup and log what is wired in.
async fn announce_adapters(adapters: &[Arc<dyn CapabilityAdapter>]) {
    for adapter in adapters {
        let summary = adapter_summary(adapter.as_ref());
        match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => info!(adapter = %summary, "adapter ready"),
            Ok(HealthStatus::Degraded(reason)) => {
                warn!(adapter = %summary, %reason, "adapter degraded");
            }
            Ok(HealthStatus::Unhealthy(reason)) => {
                warn!(adapter = %summary, %reason, "adapter unhealthy");
            }
            Err(err) => warn!(adapter = %summary, error = %err, "adapter health check failed"),
        }
    }
}

/// Shut adapters down in wiring order, logging failures instead of aborting.
async fn shutdown_adapters(adapters: &[Arc<dyn CapabilityAdapter>]) {
    for adapter in adapters {
        if let Err(err) = adapter.shutdown().await {
            warn!(adapter = adapter.name(), error = %err, "adapter shutdown failed");
        }
    }
}

fn adapter_summary(adapter: &dyn CapabilityAdapter) -> String {
    format!(
        "{} v{} [{}]",
        adapter.name(),
        adapter.version(),
        adapter.adapter_type()
    )
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("glucora={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
