// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording event sink.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use glucora_core::{EventSink, SourceRef};

/// An event sink that records everything it receives.
///
/// `close()` flips `is_closed` so tests can check that producers stop
/// writing once the consumer is gone.
#[derive(Default)]
pub struct CollectingSink {
    tokens: Mutex<Vec<String>>,
    sources: Mutex<Vec<SourceRef>>,
    closed: AtomicBool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    /// All received tokens joined in arrival order.
    pub fn assembled_text(&self) -> String {
        self.tokens.lock().unwrap().concat()
    }

    pub fn sources(&self) -> Vec<SourceRef> {
        self.sources.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for CollectingSink {
    async fn token(&self, text: &str) {
        if !self.is_closed() {
            self.tokens.lock().unwrap().push(text.to_string());
        }
    }

    async fn sources(&self, sources: &[SourceRef]) {
        if !self.is_closed() {
            self.sources.lock().unwrap().extend_from_slice(sources);
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_tokens_in_order() {
        let sink = CollectingSink::new();
        sink.token("hello ").await;
        sink.token("world").await;
        assert_eq!(sink.assembled_text(), "hello world");
    }

    #[tokio::test]
    async fn closed_sink_swallows_writes() {
        let sink = CollectingSink::new();
        sink.token("before").await;
        sink.close();
        sink.token("after").await;
        assert_eq!(sink.tokens(), vec!["before".to_string()]);
        assert!(sink.is_closed());
    }
}
