// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use glucora_core::{
    CostTier, DiabetesProfile, GlucoraError, ProcessingTier, Question, ResponseEnvelope,
    SessionId, Tier,
};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;
use crate::sse;

/// Request body for POST /v1/answers.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// The question text.
    pub question: String,
    /// Opaque caller identity, used for rate limiting.
    pub user_id: String,
    /// Optional medical profile for personalization.
    #[serde(default)]
    pub profile: Option<DiabetesProfile>,
    /// Optional session ID to continue a conversation.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for POST /v1/answers (non-streaming path).
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// Session ID (may be newly created).
    pub session_id: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error response body for a rate-limit denial.
#[derive(Debug, Serialize)]
pub struct RateLimitResponse {
    pub error: String,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub tiers: Vec<TierInfo>,
    pub research_daily_limit: u32,
}

/// One routing tier as advertised by the health endpoint.
#[derive(Debug, Serialize)]
pub struct TierInfo {
    pub tier: Tier,
    pub processing_tier: ProcessingTier,
    pub cost_tier: CostTier,
}

/// POST /v1/answers
///
/// Runs the answer pipeline and returns the response envelope. When the
/// Accept header contains `text/event-stream` the same route streams the
/// answer as SSE instead.
pub async fn post_answers(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<AnswerRequest>,
) -> Response {
    let accept = headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if accept.contains("text/event-stream") {
        return sse::stream_answers(state, body).await.into_response();
    }

    let question = Question {
        text: body.question,
        user_id: body.user_id,
        profile: body.profile,
    };
    let session_id = body.session_id.map(SessionId);

    match state.engine.answer(question, session_id).await {
        Ok(outcome) => Json(AnswerResponse {
            envelope: outcome.envelope,
            session_id: outcome.session_id.0,
        })
        .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /v1/usage/{user_id}
pub async fn get_usage(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Response {
    match state.engine.usage(&user_id).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(err @ GlucoraError::InvalidInput(_)) => error_response(err),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /health (unauthenticated)
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let tiers = [Tier::Direct, Tier::SearchAugmented, Tier::DeepResearch]
        .into_iter()
        .map(|tier| TierInfo {
            tier,
            processing_tier: tier.processing_label(),
            cost_tier: tier.cost_tier(),
        })
        .collect();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tiers,
        research_daily_limit: state.engine.research_daily_limit(),
    })
}

fn error_response(err: GlucoraError) -> Response {
    match err {
        GlucoraError::InvalidInput(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
        GlucoraError::RateLimited { remaining, reset_at } => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(RateLimitResponse {
                error: "daily research limit reached".to_string(),
                remaining,
                reset_at,
            }),
        )
            .into_response(),
        other => {
            tracing::error!(error = %other, "answer pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal error".to_string(),
                }),
            )
                .into_response()
        }
    }
}
