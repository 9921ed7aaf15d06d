// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared streaming generation path for the tier executors.

use std::sync::Arc;

use futures::StreamExt;
use glucora_core::{DiabetesProfile, EventSink, GenerateAdapter, GenerationRequest, SourceSnippet};
use tracing::warn;

/// Answer used when generation fails outright.
pub(crate) const FALLBACK_ANSWER: &str = "I'm having trouble generating an answer \
right now. Please try again in a moment.";

/// Generate an answer, forwarding chunks to the sink as they arrive.
///
/// Prefers the streaming call and falls back to a single-shot generation if
/// the stream cannot be opened. When the sink's consumer is gone the rest of
/// the stream is abandoned and the partial answer returned; nothing
/// downstream will deliver it anyway. Never fails: total generation failure
/// yields [`FALLBACK_ANSWER`].
pub(crate) async fn stream_answer(
    generator: &Arc<dyn GenerateAdapter>,
    request: GenerationRequest,
    sink: &dyn EventSink,
) -> String {
    let fallback_request = request.clone();
    match generator.generate_stream(request).await {
        Ok(mut stream) => {
            let mut answer = String::new();
            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(text) => {
                        sink.token(&text).await;
                        answer.push_str(&text);
                    }
                    Err(err) => {
                        warn!(error = %err, "generation stream broke mid-answer");
                        break;
                    }
                }
                if sink.is_closed() {
                    break;
                }
            }
            if answer.is_empty() {
                FALLBACK_ANSWER.to_string()
            } else {
                answer
            }
        }
        Err(err) => {
            warn!(error = %err, "streaming unavailable, retrying single-shot");
            match generator.generate(fallback_request).await {
                Ok(answer) => {
                    sink.token(&answer).await;
                    answer
                }
                Err(err) => {
                    warn!(error = %err, "generation failed, serving fallback answer");
                    FALLBACK_ANSWER.to_string()
                }
            }
        }
    }
}

/// Render the caller-supplied profile as prompt context so the model can
/// tailor examples to the user's condition and medications.
pub(crate) fn profile_block(profile: &DiabetesProfile) -> String {
    let mut block = format!("About this user: {}", profile.condition.label());
    if !profile.medications.is_empty() {
        block.push_str("; current medications: ");
        block.push_str(&profile.medications.join(", "));
    }
    block.push('.');
    block
}

/// Append the profile block to a prompt under construction, if one was given.
pub(crate) fn push_profile_context(user_text: &mut String, profile: Option<&DiabetesProfile>) {
    if let Some(profile) = profile {
        user_text.push_str("\n\n");
        user_text.push_str(&profile_block(profile));
    }
}

/// Render retrieved snippets as a grounding block appended to the question.
pub(crate) fn grounding_block(heading: &str, snippets: &[SourceSnippet]) -> String {
    let mut block = String::new();
    block.push_str(heading);
    for (i, s) in snippets.iter().enumerate() {
        block.push_str(&format!("\n{}. {} — {}\n   {}", i + 1, s.title, s.url, s.snippet));
    }
    block
}

#[cfg(test)]
mod tests {
    use glucora_core::{ConditionType, NullSink};
    use glucora_test_utils::{CollectingSink, FailingGenerator, MockGenerator};

    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "test-model".to_string(),
            system_prompt: None,
            user_text: "q".to_string(),
            max_tokens: 64,
        }
    }

    #[tokio::test]
    async fn streams_chunks_to_sink_and_accumulates() {
        let generator: Arc<dyn GenerateAdapter> =
            Arc::new(MockGenerator::new().with_response("alpha beta"));
        let sink = CollectingSink::new();
        let answer = stream_answer(&generator, request(), &sink).await;
        assert_eq!(answer, "alpha beta");
        assert_eq!(sink.assembled_text(), "alpha beta");
    }

    #[tokio::test]
    async fn total_failure_yields_fallback_answer() {
        let generator: Arc<dyn GenerateAdapter> = Arc::new(FailingGenerator::new());
        let answer = stream_answer(&generator, request(), &NullSink).await;
        assert_eq!(answer, FALLBACK_ANSWER);
    }

    #[test]
    fn profile_block_names_condition_and_medications() {
        let profile = DiabetesProfile {
            condition: ConditionType::Type2,
            medications: vec!["metformin".to_string(), "jardiance".to_string()],
        };
        assert_eq!(
            profile_block(&profile),
            "About this user: type 2 diabetes; current medications: metformin, jardiance."
        );

        let bare = DiabetesProfile {
            condition: ConditionType::Prediabetes,
            medications: Vec::new(),
        };
        assert_eq!(profile_block(&bare), "About this user: prediabetes.");
    }

    #[test]
    fn absent_profile_leaves_prompt_untouched() {
        let mut user_text = "question".to_string();
        push_profile_context(&mut user_text, None);
        assert_eq!(user_text, "question");
    }
}
