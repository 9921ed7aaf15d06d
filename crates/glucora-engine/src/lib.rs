// SPDX-FileCopyrightText: 2026 Glucora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request pipeline orchestration.
//!
//! [`AnswerEngine`] wires the whole pipeline together: validate, resolve
//! references against the session window, route to a tier, gate the research
//! tier through the daily limiter, execute, normalize, and record the turn.
//! Only two failures ever reach the caller: invalid input and a rate-limit
//! denial. Everything downstream of routing degrades inside the executors
//! instead of erroring.

mod engine;
mod session;

pub use engine::{AnswerEngine, AnswerOutcome, EngineOptions};
pub use session::{SessionOptions, SessionStore};
