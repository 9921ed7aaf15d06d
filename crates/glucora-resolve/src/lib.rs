// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anaphoric reference resolution over recent conversation turns.
//!
//! Follow-up questions lean on earlier turns ("is that too high?", "what
//! about the same for dinner"). This module detects those references and
//! binds them to the most recent matching antecedent in the session window.
//! The user's question text is never rewritten; resolution produces guidance
//! text that travels alongside the question so the original wording stays
//! auditable. Resolution never fails: an unbindable reference becomes an
//! explicit note instead of an error.

use std::fmt;
use std::sync::LazyLock;

use glucora_core::ConversationTurn;
use regex::Regex;
use tracing::debug;

/// Category of anaphoric reference detected in a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Bare pronouns standing in for an earlier entity: "it", "that", "they".
    Pronoun,
    /// Time-shifted references to an earlier event: "that day", "back then".
    TemporalDeixis,
    /// Elided comparisons that re-use an earlier quantity: "the same for dinner".
    EllipticalComparison,
    /// Definite noun phrases whose referent was named earlier: "the dose".
    DefiniteShorthand,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReferenceKind::Pronoun => "pronoun",
            ReferenceKind::TemporalDeixis => "temporal reference",
            ReferenceKind::EllipticalComparison => "elliptical comparison",
            ReferenceKind::DefiniteShorthand => "definite shorthand",
        };
        f.write_str(label)
    }
}

/// A single detected reference and, where possible, its antecedent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub kind: ReferenceKind,
    /// The phrase as it appears in the question.
    pub phrase: String,
    /// The bound antecedent from an earlier turn, if one was found.
    pub antecedent: Option<String>,
}

/// Outcome of resolving a question against the session window.
///
/// `question` is always the caller's original text, unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub question: String,
    /// Guidance lines for the downstream prompt; empty when nothing was
    /// detected.
    pub guidance: String,
    pub detections: Vec<Detection>,
}

impl Resolution {
    /// True when at least one reference was found, bound or not.
    pub fn has_references(&self) -> bool {
        !self.detections.is_empty()
    }
}

// Detection patterns, in binding priority order. Longer, more specific
// phrases are matched first so "that day" is temporal deixis rather than a
// bare pronoun "that".
static TEMPORAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:that (?:day|morning|afternoon|evening|night|time|meal|reading)|back then|at the time|earlier today|yesterday's)\b",
    )
    .unwrap()
});

static ELLIPTICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:the same(?: (?:amount|thing|dose|number|meal|carbs))?|same as (?:before|last time)|likewise)\b",
    )
    .unwrap()
});

static SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:the|my) (?:dose|dosage|reading|number|level|ratio|meal|medication|injection)\b",
    )
    .unwrap()
});

static PRONOUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:it|that|this|they|them|those)\b").unwrap());

// Antecedent candidates, by decreasing specificity. Quantities with units
// first ("40g carbs", "7.2 mmol/l"), then glucose readings, then named
// mealtimes.
static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s*(?:g|mg|ml|units?|grams?)\b(?:\s+(?:of\s+)?(?:carbs?|carbohydrates?|protein|insulin|sugar))?",
    )
    .unwrap()
});

static READING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?\s*(?:mmol/?l|mg/dl)\b").unwrap()
});

static MEALTIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:breakfast|lunch|dinner|bedtime|overnight|fasting)\b").unwrap()
});

/// Resolves anaphoric references in a question against recent turns.
///
/// Stateless; the session window is passed per call, newest turn last.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceResolver;

impl ReferenceResolver {
    pub fn new() -> Self {
        Self
    }

    /// Detect references in `question` and bind each to the most recent
    /// matching antecedent in `turns`. Never fails; with no detections the
    /// guidance is empty and the question passes through untouched.
    pub fn resolve(&self, question: &str, turns: &[ConversationTurn]) -> Resolution {
        let detections = detect(question);
        if detections.is_empty() {
            return Resolution {
                question: question.to_string(),
                guidance: String::new(),
                detections,
            };
        }

        let bound: Vec<Detection> = detections
            .into_iter()
            .map(|d| {
                let antecedent = bind(d.kind, turns);
                Detection { antecedent, ..d }
            })
            .collect();

        debug!(
            references = bound.len(),
            unbound = bound.iter().filter(|d| d.antecedent.is_none()).count(),
            "resolved question references"
        );

        let guidance = render_guidance(&bound);
        Resolution {
            question: question.to_string(),
            guidance,
            detections: bound,
        }
    }
}

/// Scan the question with each pattern in priority order, discarding
/// lower-priority matches that overlap an already accepted span.
fn detect(question: &str) -> Vec<Detection> {
    let passes: [(&Regex, ReferenceKind); 4] = [
        (&TEMPORAL, ReferenceKind::TemporalDeixis),
        (&ELLIPTICAL, ReferenceKind::EllipticalComparison),
        (&SHORTHAND, ReferenceKind::DefiniteShorthand),
        (&PRONOUN, ReferenceKind::Pronoun),
    ];

    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut detections = Vec::new();
    for (pattern, kind) in passes {
        for m in pattern.find_iter(question) {
            let overlaps = spans
                .iter()
                .any(|&(start, end)| m.start() < end && m.end() > start);
            if overlaps {
                continue;
            }
            spans.push((m.start(), m.end()));
            detections.push(Detection {
                kind,
                phrase: m.as_str().to_string(),
                antecedent: None,
            });
        }
    }
    // Report in question order rather than pattern-priority order.
    detections.sort_by_key(|d| question.find(&d.phrase).unwrap_or(usize::MAX));
    detections
}

/// Find the most recent antecedent suitable for a reference kind.
///
/// Turns are scanned newest first, the question text before the answer, so
/// the most recently mentioned entity wins.
fn bind(kind: ReferenceKind, turns: &[ConversationTurn]) -> Option<String> {
    for turn in turns.iter().rev() {
        for text in [turn.question.as_str(), turn.answer.as_str()] {
            if let Some(found) = extract_antecedent(kind, text) {
                return Some(found);
            }
        }
    }
    None
}

fn extract_antecedent(kind: ReferenceKind, text: &str) -> Option<String> {
    match kind {
        // Comparisons and shorthand want a concrete quantity or reading.
        ReferenceKind::EllipticalComparison | ReferenceKind::DefiniteShorthand => QUANTITY
            .find(text)
            .or_else(|| READING.find(text))
            .map(|m| m.as_str().trim().to_string()),
        // Temporal deixis wants the event it points back at; a mealtime or
        // reading anchors it.
        ReferenceKind::TemporalDeixis => MEALTIME
            .find(text)
            .or_else(|| READING.find(text))
            .map(|m| m.as_str().to_string()),
        // Pronouns take whatever concrete entity was mentioned last.
        ReferenceKind::Pronoun => READING
            .find(text)
            .or_else(|| QUANTITY.find(text))
            .or_else(|| MEALTIME.find(text))
            .map(|m| m.as_str().trim().to_string()),
    }
}

fn render_guidance(detections: &[Detection]) -> String {
    let mut lines = Vec::with_capacity(detections.len() + 1);
    lines.push("Context from earlier in this conversation:".to_string());
    for d in detections {
        match &d.antecedent {
            Some(antecedent) => lines.push(format!(
                "- \"{}\" ({}) most likely refers to \"{}\" from an earlier turn.",
                d.phrase, d.kind, antecedent
            )),
            None => lines.push(format!(
                "- \"{}\" ({}) could not be matched to anything in recent turns; \
                 ask the user to clarify rather than guessing.",
                d.phrase, d.kind
            )),
        }
    }
    lines.join("\n")
}
