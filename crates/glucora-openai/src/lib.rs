// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat completions adapter.
//!
//! Implements the generation capability over any endpoint speaking the
//! OpenAI chat completions protocol, with bearer auth, per-call timeouts,
//! transient-error retry, and SSE token streaming.

pub mod client;
pub mod sse;
pub mod types;

pub use client::{OpenAiGenerator, OpenAiOptions};
