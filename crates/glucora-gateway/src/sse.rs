// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events streaming for POST /v1/answers.
//!
//! Event format:
//! ```text
//! event: token
//! data: {"text": "partial answer text"}
//!
//! event: sources
//! data: [{"title": "...", "url": "...", "type": "pubmed"}, ...]
//!
//! event: done
//! data: {"response": {<full envelope>}, "session_id": "..."}
//! ```
//! A pipeline failure replaces `done` with a terminal `error` event.
//!
//! The connection tracks three states: open, closing (terminal event being
//! written), closed. Writes after close are no-ops, so an executor still
//! running when the client disconnects finishes quietly.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use glucora_core::{EventSink, GlucoraError, Question, ResponseEnvelope, SessionId, SourceRef};
use tokio::sync::mpsc;

use crate::handlers::AnswerRequest;
use crate::server::GatewayState;

const STATE_OPEN: u8 = 0;
const STATE_CLOSING: u8 = 1;
const STATE_CLOSED: u8 = 2;

/// An [`EventSink`] writing SSE events to one connection.
pub struct SseSink {
    tx: mpsc::Sender<Event>,
    state: AtomicU8,
}

impl SseSink {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self {
            tx,
            state: AtomicU8::new(STATE_OPEN),
        }
    }

    async fn send_while_open(&self, event: Event) {
        if self.state.load(Ordering::SeqCst) != STATE_OPEN {
            return;
        }
        if self.tx.send(event).await.is_err() {
            // Receiver dropped: client went away mid-stream.
            self.state.store(STATE_CLOSED, Ordering::SeqCst);
        }
    }

    /// Emit the terminal `done` event and close the connection.
    pub async fn done(&self, envelope: &ResponseEnvelope, session_id: &SessionId) {
        if self
            .state
            .compare_exchange(STATE_OPEN, STATE_CLOSING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        let payload = serde_json::json!({
            "response": envelope,
            "session_id": session_id.0,
        });
        let _ = self
            .tx
            .send(Event::default().event("done").data(payload.to_string()))
            .await;
        self.state.store(STATE_CLOSED, Ordering::SeqCst);
    }

    /// Emit a terminal `error` event and close the connection.
    pub async fn error(&self, err: &GlucoraError) {
        if self
            .state
            .compare_exchange(STATE_OPEN, STATE_CLOSING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        let payload = match err {
            GlucoraError::RateLimited { remaining, reset_at } => serde_json::json!({
                "error": err.to_string(),
                "kind": "rate_limited",
                "remaining": remaining,
                "reset_at": reset_at,
            }),
            GlucoraError::InvalidInput(_) => serde_json::json!({
                "error": err.to_string(),
                "kind": "invalid_input",
            }),
            _ => serde_json::json!({
                "error": err.to_string(),
                "kind": "internal",
            }),
        };
        let _ = self
            .tx
            .send(Event::default().event("error").data(payload.to_string()))
            .await;
        self.state.store(STATE_CLOSED, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventSink for SseSink {
    async fn token(&self, text: &str) {
        let payload = serde_json::json!({ "text": text });
        self.send_while_open(Event::default().event("token").data(payload.to_string()))
            .await;
    }

    async fn sources(&self, sources: &[SourceRef]) {
        let payload = serde_json::json!(sources);
        self.send_while_open(Event::default().event("sources").data(payload.to_string()))
            .await;
    }

    fn is_closed(&self) -> bool {
        self.state.load(Ordering::SeqCst) == STATE_CLOSED || self.tx.is_closed()
    }
}

/// Stream an answer as Server-Sent Events.
///
/// Spawns the pipeline and returns immediately; events flow through a
/// bounded channel as the executor produces them.
pub async fn stream_answers(
    state: GatewayState,
    body: AnswerRequest,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<Event>(32);
    let sink = Arc::new(SseSink::new(tx));

    let question = Question {
        text: body.question,
        user_id: body.user_id,
        profile: body.profile,
    };
    let session_id = body.session_id.map(SessionId);
    let engine = Arc::clone(&state.engine);
    let task_sink = Arc::clone(&sink);

    tokio::spawn(async move {
        match engine
            .answer_with_sink(question, session_id, task_sink.as_ref())
            .await
        {
            Ok(outcome) => {
                task_sink.done(&outcome.envelope, &outcome.session_id).await;
            }
            Err(err) => task_sink.error(&err).await,
        }
    });

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (Ok(event), rx))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
