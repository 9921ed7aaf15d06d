// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event sink trait for incremental response delivery.

use async_trait::async_trait;

use crate::types::SourceRef;

/// Receives incremental output while an executor runs.
///
/// The streaming transport implements this over its connection; the
/// non-streaming path uses [`NullSink`]. Sends never fail: a sink whose
/// consumer has gone away must swallow writes and report `is_closed`, so
/// executors can abandon in-flight work best-effort without erroring.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers one generated text chunk, in producer order.
    async fn token(&self, text: &str);

    /// Delivers the source citations gathered for this response.
    async fn sources(&self, sources: &[SourceRef]);

    /// True once the consumer is gone; further work for this request
    /// can be abandoned.
    fn is_closed(&self) -> bool;
}

/// A sink that discards everything, for the non-streaming path.
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn token(&self, _text: &str) {}

    async fn sources(&self, _sources: &[SourceRef]) {}

    fn is_closed(&self) -> bool {
        false
    }
}
