// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/SSE gateway for the Glucora answer engine.
//!
//! Routes:
//! - `POST /v1/answers` — answer a question; `Accept: text/event-stream`
//!   switches the same route to SSE streaming
//! - `GET /v1/usage/{user_id}` — research-tier usage snapshot
//! - `GET /health` — unauthenticated liveness and architecture summary
//!
//! `/v1/*` routes sit behind optional bearer auth.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{GatewayState, ServerOptions, build_router, start_server};
