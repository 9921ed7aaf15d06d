// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE parser for streamed chat completions.
//!
//! The protocol sends unnamed SSE events whose `data` field is either a JSON
//! [`crate::types::ChatChunk`] or the literal `[DONE]` sentinel.

use eventsource_stream::Eventsource;
use futures::stream::StreamExt;
use glucora_core::{GlucoraError, TextStream};

use crate::types::ChatChunk;

/// Parses a streaming chat completions response into a text chunk stream.
///
/// Empty deltas (role-only first chunk, finish chunk) are skipped; the
/// `[DONE]` sentinel and anything after it are ignored.
pub fn parse_chat_stream(response: reqwest::Response) -> TextStream {
    let event_stream = response.bytes_stream().eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => {
                if event.data.trim() == "[DONE]" {
                    return None;
                }
                match serde_json::from_str::<ChatChunk>(&event.data) {
                    Ok(chunk) => chunk
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|choice| choice.delta.content)
                        .filter(|text| !text.is_empty())
                        .map(Ok),
                    Err(e) => Some(Err(GlucoraError::Generation {
                        message: format!("failed to parse stream chunk: {e}"),
                        source: Some(Box::new(e)),
                    })),
                }
            }
            Err(e) => Some(Err(GlucoraError::Generation {
                message: format!("SSE stream error: {e}"),
                source: None,
            })),
        }
    });

    Box::pin(mapped)
}
