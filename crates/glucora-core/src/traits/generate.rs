// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation adapter trait for the black-box text generation capability.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::GlucoraError;
use crate::traits::adapter::CapabilityAdapter;
use crate::types::GenerationRequest;

/// An ordered stream of generated text chunks.
pub type TextStream =
    Pin<Box<dyn Stream<Item = Result<String, GlucoraError>> + Send>>;

/// Adapter for the generation capability: "generate text given a prompt,
/// optionally stream tokens".
///
/// The router uses it for the cheap classification call; the executors use it
/// for answer synthesis. Implementations must be safe to share across
/// concurrent requests.
#[async_trait]
pub trait GenerateAdapter: CapabilityAdapter {
    /// Sends a generation request and returns the full response text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GlucoraError>;

    /// Sends a generation request and returns a stream of text chunks
    /// in producer order.
    async fn generate_stream(
        &self,
        request: GenerationRequest,
    ) -> Result<TextStream, GlucoraError>;
}
