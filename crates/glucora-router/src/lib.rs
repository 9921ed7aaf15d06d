// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tier routing for the Glucora answer engine.
//!
//! Every question gets exactly one [`glucora_core::RoutingDecision`] before
//! execution. Cheap lexical checks run first: greeting-style questions go
//! straight to the direct tier and explicit research cues go straight to the
//! research tier. Everything else is classified by a small, fast model with
//! a hard timeout. Routing never fails; any classifier problem falls back to
//! the direct tier with zero confidence.

mod cues;
mod router;

pub use cues::{has_research_cue, is_simple_exchange};
pub use router::{RouterOptions, TierRouter};
