// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state.

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use glucora_core::GlucoraError;
use glucora_engine::AnswerEngine;
use tower_http::cors::CorsLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<AnswerEngine>,
    pub auth: AuthConfig,
}

/// Bind address for the gateway listener. Auth lives on
/// [`GatewayState::auth`], not here.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// `/health` is public; everything under `/v1/` goes through the auth
/// middleware.
pub fn build_router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/answers", post(handlers::post_answers))
        .route("/v1/usage/{user_id}", get(handlers::get_usage))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until the process stops.
pub async fn start_server(
    options: &ServerOptions,
    state: GatewayState,
) -> Result<(), GlucoraError> {
    let app = build_router(state);

    let addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GlucoraError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| GlucoraError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
