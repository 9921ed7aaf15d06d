// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for the Glucora answer engine.
//!
//! Composes a complete system prompt from fixed identity/style/rules
//! fragments plus a tier-specific behavior fragment. Pure function of the
//! tier: repeated calls return byte-identical output.

pub mod fragments;

use glucora_core::Tier;

use crate::fragments::{
    CRITICAL_RULES, IDENTITY, STYLE, TIER_DIRECT, TIER_RESEARCH, TIER_SEARCH,
};

/// Assemble the system prompt for a tier.
///
/// Concatenates, in fixed order: identity, communication style, critical
/// rules, then the tier-specific guidance fragment. Taking [`Tier`] rather
/// than a number makes an out-of-range tier unrepresentable.
pub fn assemble(tier: Tier) -> String {
    let tier_fragment = match tier {
        Tier::Direct => TIER_DIRECT,
        Tier::SearchAugmented => TIER_SEARCH,
        Tier::DeepResearch => TIER_RESEARCH,
    };

    let mut prompt = String::with_capacity(
        IDENTITY.len() + STYLE.len() + CRITICAL_RULES.len() + tier_fragment.len() + 8,
    );
    for fragment in [IDENTITY, STYLE, CRITICAL_RULES, tier_fragment] {
        if !prompt.is_empty() {
            prompt.push_str("\n\n");
        }
        prompt.push_str(fragment);
    }
    prompt
}
