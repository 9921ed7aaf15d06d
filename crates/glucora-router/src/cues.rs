// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical routing cues checked before the model classifier.

/// Questions matched exactly (after trimming and lowercasing) that need no
/// classification at all.
const SIMPLE_EXACT: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "thanks",
    "thank you",
    "ok",
    "okay",
    "good morning",
    "good evening",
    "goodbye",
    "bye",
];

/// Substrings that mark an explicit request for research-grade evidence.
/// Only these phrases can put a question on the research tier.
const RESEARCH_CUES: &[&str] = &[
    "latest research",
    "recent research",
    "latest studies",
    "recent studies",
    "new studies",
    "clinical trial",
    "clinical trials",
    "what does the research say",
    "what do studies say",
    "research evidence",
    "evidence from studies",
    "meta-analysis",
    "systematic review",
    "peer-reviewed",
    "new treatments",
    "emerging treatments",
    "recent findings",
];

/// True for greeting-style exchanges that always take the direct tier.
pub fn is_simple_exchange(question: &str) -> bool {
    let trimmed = question.trim().trim_end_matches(['!', '.']).to_lowercase();
    SIMPLE_EXACT.contains(&trimmed.as_str())
}

/// True when the question carries an explicit research cue.
pub fn has_research_cue(question: &str) -> bool {
    let lowered = question.to_lowercase();
    RESEARCH_CUES.iter().any(|cue| lowered.contains(cue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_are_simple() {
        assert!(is_simple_exchange("Hello!"));
        assert!(is_simple_exchange("  thanks  "));
        assert!(!is_simple_exchange("hello, what is an A1C test?"));
    }

    #[test]
    fn research_cues_are_case_insensitive() {
        assert!(has_research_cue(
            "What does the LATEST RESEARCH say about metformin timing?"
        ));
        assert!(has_research_cue(
            "Are there clinical trials for dual GIP/GLP-1 agonists?"
        ));
        assert!(!has_research_cue("What is a normal fasting glucose?"));
    }
}
